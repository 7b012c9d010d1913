use serde_json::Value;

use crate::domain::template::sub;

/// A Lambda function, deployed outside this stack, that backs a custom resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerFunction {
    pub function_name: String,
}

impl HandlerFunction {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
        }
    }

    /// `ServiceToken` value pointing at the function in the deploying account and region.
    pub fn service_token(&self) -> Value {
        sub(&format!(
            "arn:${{AWS::Partition}}:lambda:${{AWS::Region}}:${{AWS::AccountId}}:function:{}",
            self.function_name
        ))
    }
}
