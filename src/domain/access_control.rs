use serde_json::{json, Map, Value};

use crate::domain::{
    error::StackError,
    stack::Stack,
    template::{get_att, Resource},
};

pub const ORIGIN_ACCESS_CONTROL_RESOURCE_TYPE: &str = "AWS::CloudFront::OriginAccessControl";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginType {
    S3,
}

impl OriginType {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::S3 => "s3",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningBehavior {
    Always,
}

impl SigningBehavior {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Always => "always",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningProtocol {
    SigV4,
}

impl SigningProtocol {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::SigV4 => "sigv4",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginAccessControlProps {
    pub name: String,
    pub origin_type: OriginType,
    pub signing_behavior: SigningBehavior,
    pub signing_protocol: SigningProtocol,
    pub description: Option<String>,
}

/// Signing-based credentials CloudFront uses to reach a private origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginAccessControl {
    logical_id: String,
}

impl OriginAccessControl {
    pub fn new(
        stack: &mut Stack,
        id: &str,
        props: OriginAccessControlProps,
    ) -> Result<Self, StackError> {
        if props.name.is_empty() {
            return Err(StackError::MissingRequired {
                construct: "OriginAccessControl",
                what: "name",
            });
        }

        let mut config = Map::new();
        config.insert("Name".into(), json!(props.name));
        config.insert(
            "OriginAccessControlOriginType".into(),
            json!(props.origin_type.as_label()),
        );
        config.insert(
            "SigningBehavior".into(),
            json!(props.signing_behavior.as_label()),
        );
        config.insert(
            "SigningProtocol".into(),
            json!(props.signing_protocol.as_label()),
        );
        if let Some(description) = props.description {
            config.insert("Description".into(), json!(description));
        }

        let mut properties = Map::new();
        properties.insert("OriginAccessControlConfig".into(), Value::Object(config));

        let logical_id = stack.add_resource(
            &[id],
            Resource::new(ORIGIN_ACCESS_CONTROL_RESOURCE_TYPE, properties),
        )?;

        Ok(Self { logical_id })
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    pub fn attr_id(&self) -> Value {
        get_att(&self.logical_id, "Id")
    }
}
