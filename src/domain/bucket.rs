//! S3 bucket construct: the bucket itself, its optional resource policy, and
//! the custom resource that empties it before deletion.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::{
    error::StackError,
    handler::HandlerFunction,
    policy::{PolicyDocument, PolicyStatement},
    stack::Stack,
    template::{get_att, join, reference, RemovalPolicy, Resource},
};

pub const BUCKET_RESOURCE_TYPE: &str = "AWS::S3::Bucket";
pub const BUCKET_POLICY_RESOURCE_TYPE: &str = "AWS::S3::BucketPolicy";
pub const AUTO_DELETE_RESOURCE_TYPE: &str = "Custom::S3AutoDeleteObjects";
pub const AUTO_DELETE_OBJECTS_TAG: &str = "auto-delete-objects";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectOwnership {
    BucketOwnerEnforced,
    BucketOwnerPreferred,
    ObjectWriter,
}

impl ObjectOwnership {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::BucketOwnerEnforced => "BucketOwnerEnforced",
            Self::BucketOwnerPreferred => "BucketOwnerPreferred",
            Self::ObjectWriter => "ObjectWriter",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketProps {
    pub bucket_name: String,
    pub versioned: bool,
    pub removal_policy: RemovalPolicy,
    /// Handler that purges every object version before the bucket is deleted.
    pub auto_delete_objects: Option<HandlerFunction>,
    pub object_ownership: Option<ObjectOwnership>,
}

impl BucketProps {
    pub fn named(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: bucket_name.into(),
            versioned: false,
            removal_policy: RemovalPolicy::Retain,
            auto_delete_objects: None,
            object_ownership: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    construct_id: String,
    logical_id: String,
    bucket_name: String,
    policy_logical_id: Option<String>,
    auto_delete_logical_id: Option<String>,
}

impl Bucket {
    pub fn new(stack: &mut Stack, id: &str, props: BucketProps) -> Result<Self, StackError> {
        validate_bucket_name(&props.bucket_name)?;

        if props.auto_delete_objects.is_some() && props.removal_policy != RemovalPolicy::Destroy {
            return Err(StackError::AutoDeleteRequiresDestroy {
                bucket: props.bucket_name,
            });
        }

        let mut properties = Map::new();
        properties.insert("BucketName".into(), json!(props.bucket_name));
        if props.versioned {
            properties.insert(
                "VersioningConfiguration".into(),
                json!({ "Status": "Enabled" }),
            );
        }
        if let Some(ownership) = props.object_ownership {
            properties.insert(
                "OwnershipControls".into(),
                json!({ "Rules": [{ "ObjectOwnership": ownership.as_label() }] }),
            );
        }
        if props.auto_delete_objects.is_some() {
            properties.insert(
                "Tags".into(),
                json!([{ "Key": AUTO_DELETE_OBJECTS_TAG, "Value": "true" }]),
            );
        }

        let logical_id = stack.add_resource(
            &[id, "Resource"],
            Resource::new(BUCKET_RESOURCE_TYPE, properties).with_removal_policy(props.removal_policy),
        )?;

        let auto_delete_logical_id = match &props.auto_delete_objects {
            Some(handler) => {
                let mut custom = Map::new();
                custom.insert("ServiceToken".into(), handler.service_token());
                custom.insert("BucketName".into(), reference(&logical_id));

                let custom_id = stack.add_resource(
                    &[id, "AutoDeleteObjectsCustomResource", "Default"],
                    Resource::new(AUTO_DELETE_RESOURCE_TYPE, custom)
                        .with_removal_policy(RemovalPolicy::Destroy),
                )?;
                Some(custom_id)
            }
            None => None,
        };

        Ok(Self {
            construct_id: id.to_owned(),
            logical_id,
            bucket_name: props.bucket_name,
            policy_logical_id: None,
            auto_delete_logical_id,
        })
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket_name
    }

    #[cfg(test)]
    pub fn policy_logical_id(&self) -> Option<&str> {
        self.policy_logical_id.as_deref()
    }

    #[cfg(test)]
    pub fn auto_delete_logical_id(&self) -> Option<&str> {
        self.auto_delete_logical_id.as_deref()
    }

    pub fn reference(&self) -> Value {
        reference(&self.logical_id)
    }

    pub fn arn(&self) -> Value {
        get_att(&self.logical_id, "Arn")
    }

    pub fn regional_domain_name(&self) -> Value {
        get_att(&self.logical_id, "RegionalDomainName")
    }

    /// ARN matching object keys, e.g. `arn_for_objects("*")`.
    pub fn arn_for_objects(&self, key_pattern: &str) -> Value {
        join("", vec![self.arn(), json!(format!("/{key_pattern}"))])
    }

    /// Appends a statement to the bucket policy, declaring the policy on first use.
    pub fn add_to_resource_policy(
        &mut self,
        stack: &mut Stack,
        statement: PolicyStatement,
    ) -> Result<(), StackError> {
        if let Some(policy_id) = &self.policy_logical_id {
            let statements = stack
                .resource_mut(policy_id)?
                .properties
                .get_mut("PolicyDocument")
                .and_then(|document| document.get_mut("Statement"))
                .and_then(Value::as_array_mut)
                .ok_or(StackError::MissingRequired {
                    construct: "BucketPolicy",
                    what: "PolicyDocument.Statement list",
                })?;
            statements.push(statement.render());
            return Ok(());
        }

        let mut document = PolicyDocument::default();
        document.add_statement(statement);

        let mut properties = Map::new();
        properties.insert("Bucket".into(), self.reference());
        properties.insert("PolicyDocument".into(), document.render());

        let policy_id = stack.add_resource(
            &[self.construct_id.as_str(), "Policy", "Resource"],
            Resource::new(BUCKET_POLICY_RESOURCE_TYPE, properties),
        )?;

        // The policy is deleted only after the purge has emptied the bucket.
        if let Some(custom_id) = &self.auto_delete_logical_id {
            stack.resource_mut(custom_id)?.add_dependency(&policy_id);
        }

        self.policy_logical_id = Some(policy_id);
        Ok(())
    }
}

pub fn validate_bucket_name(name: &str) -> Result<(), StackError> {
    let reason = if !(3..=63).contains(&name.len()) {
        Some("must be between 3 and 63 characters long")
    } else if !name
        .chars()
        .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '.' || ch == '-')
    {
        Some("may only contain lowercase letters, digits, periods and hyphens")
    } else if !name.starts_with(|ch: char| ch.is_ascii_alphanumeric())
        || !name.ends_with(|ch: char| ch.is_ascii_alphanumeric())
    {
        Some("must start and end with a letter or digit")
    } else if name.contains("..") {
        Some("must not contain consecutive periods")
    } else if looks_like_ip_address(name) {
        Some("must not be formatted as an IP address")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StackError::InvalidBucketName {
            name: name.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

fn looks_like_ip_address(name: &str) -> bool {
    let octets: Vec<&str> = name.split('.').collect();
    octets.len() == 4 && octets.iter().all(|octet| octet.parse::<u8>().is_ok())
}
