//! IAM policy documents attached to resources.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

pub const POLICY_VERSION: &str = "2012-10-17";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Allow,
}

impl Effect {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Allow => "Allow",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    Service(String),
}

impl Principal {
    pub fn service(name: impl Into<String>) -> Self {
        Self::Service(name.into())
    }

    fn render(&self) -> Value {
        match self {
            Self::Service(name) => json!({ "Service": name }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyStatement {
    pub sid: Option<String>,
    pub effect: Effect,
    pub principals: Vec<Principal>,
    pub actions: Vec<String>,
    pub resources: Vec<Value>,
    /// operator -> (condition key -> value)
    pub conditions: BTreeMap<String, BTreeMap<String, Value>>,
}

impl PolicyStatement {
    pub fn allow() -> Self {
        Self {
            sid: None,
            effect: Effect::Allow,
            principals: Vec::new(),
            actions: Vec::new(),
            resources: Vec::new(),
            conditions: BTreeMap::new(),
        }
    }

    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = Some(sid.into());
        self
    }

    pub fn with_principal(mut self, principal: Principal) -> Self {
        self.principals.push(principal);
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn with_resource(mut self, resource: Value) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_condition(mut self, operator: &str, key: &str, value: Value) -> Self {
        self.conditions
            .entry(operator.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        self
    }

    pub fn render(&self) -> Value {
        let mut statement = Map::new();
        if let Some(sid) = &self.sid {
            statement.insert("Sid".into(), json!(sid));
        }
        statement.insert("Effect".into(), json!(self.effect.as_label()));

        match self.principals.as_slice() {
            [] => {}
            [single] => {
                statement.insert("Principal".into(), single.render());
            }
            many => {
                let mut merged: BTreeMap<String, Vec<Value>> = BTreeMap::new();
                for principal in many {
                    if let Value::Object(entries) = principal.render() {
                        for (kind, value) in entries {
                            merged.entry(kind).or_default().push(value);
                        }
                    }
                }
                statement.insert("Principal".into(), json!(merged));
            }
        }

        statement.insert("Action".into(), collapse(self.actions.iter().map(|a| json!(a))));
        statement.insert("Resource".into(), collapse(self.resources.iter().cloned()));

        if !self.conditions.is_empty() {
            statement.insert("Condition".into(), json!(self.conditions));
        }

        Value::Object(statement)
    }
}

fn collapse(values: impl Iterator<Item = Value>) -> Value {
    let mut values: Vec<Value> = values.collect();
    if values.len() == 1 {
        values.remove(0)
    } else {
        Value::Array(values)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolicyDocument {
    pub statements: Vec<PolicyStatement>,
}

impl PolicyDocument {
    pub fn add_statement(&mut self, statement: PolicyStatement) {
        self.statements.push(statement);
    }

    pub fn render(&self) -> Value {
        json!({
            "Version": POLICY_VERSION,
            "Statement": self.statements.iter().map(PolicyStatement::render).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_valued_fields_are_not_wrapped_in_arrays() {
        let statement = PolicyStatement::allow()
            .with_sid("AllowRead")
            .with_principal(Principal::service("cloudfront.amazonaws.com"))
            .with_action("s3:GetObject")
            .with_resource(json!("arn:aws:s3:::site/*"))
            .with_condition("StringEquals", "AWS:SourceArn", json!("arn:dist"));

        let rendered = statement.render();

        assert_eq!(rendered["Sid"], "AllowRead");
        assert_eq!(rendered["Effect"], "Allow");
        assert_eq!(rendered["Principal"]["Service"], "cloudfront.amazonaws.com");
        assert_eq!(rendered["Action"], "s3:GetObject");
        assert_eq!(rendered["Resource"], "arn:aws:s3:::site/*");
        assert_eq!(rendered["Condition"]["StringEquals"]["AWS:SourceArn"], "arn:dist");
    }

    #[test]
    fn multiple_actions_render_as_array() {
        let rendered = PolicyStatement::allow()
            .with_action("s3:GetObject")
            .with_action("s3:ListBucket")
            .render();

        assert_eq!(rendered["Action"], json!(["s3:GetObject", "s3:ListBucket"]));
        assert!(rendered.get("Condition").is_none());
        assert!(rendered.get("Principal").is_none());
    }

    #[test]
    fn multiple_service_principals_are_merged() {
        let rendered = PolicyStatement::allow()
            .with_principal(Principal::service("cloudfront.amazonaws.com"))
            .with_principal(Principal::service("logging.s3.amazonaws.com"))
            .render();

        assert_eq!(
            rendered["Principal"]["Service"],
            json!(["cloudfront.amazonaws.com", "logging.s3.amazonaws.com"])
        );
    }

    #[test]
    fn document_carries_version_and_statements() {
        let mut document = PolicyDocument::default();
        document.add_statement(PolicyStatement::allow().with_action("s3:GetObject"));

        let rendered = document.render();

        assert_eq!(rendered["Version"], POLICY_VERSION);
        assert_eq!(rendered["Statement"].as_array().map(Vec::len), Some(1));
    }
}
