//! The stack: a registry of declared resources and outputs.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{json, Map, Value};

use crate::domain::{
    error::StackError,
    logical_id,
    template::{reference, Output, Resource, Template},
};

const MAX_STACK_NAME_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StackEnv {
    pub account: Option<String>,
    pub region: Option<String>,
}

impl StackEnv {
    /// Environment string in the `aws://account/region` form.
    pub fn describe(&self) -> String {
        format!(
            "aws://{}/{}",
            self.account.as_deref().unwrap_or("unknown-account"),
            self.region.as_deref().unwrap_or("unknown-region")
        )
    }
}

#[derive(Debug, Clone)]
pub struct Stack {
    name: String,
    env: StackEnv,
    description: Option<String>,
    resources: BTreeMap<String, Resource>,
    paths: BTreeSet<String>,
    outputs: BTreeMap<String, Output>,
}

impl Stack {
    pub fn new(name: impl Into<String>, env: StackEnv) -> Result<Self, StackError> {
        let name = name.into();
        validate_stack_name(&name)?;

        Ok(Self {
            name,
            env,
            description: None,
            resources: BTreeMap::new(),
            paths: BTreeSet::new(),
            outputs: BTreeMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn env(&self) -> &StackEnv {
        &self.env
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Account as a literal when pinned, else the `AWS::AccountId` pseudo parameter.
    pub fn account(&self) -> Value {
        match &self.env.account {
            Some(account) => json!(account),
            None => reference("AWS::AccountId"),
        }
    }

    pub fn add_resource(
        &mut self,
        path: &[&str],
        mut resource: Resource,
    ) -> Result<String, StackError> {
        let full_path = self.full_path(path);
        if self.paths.contains(&full_path) {
            return Err(StackError::DuplicateConstruct { path: full_path });
        }

        let logical_id = logical_id::allocate(path)?;
        if self.resources.contains_key(&logical_id) || self.outputs.contains_key(&logical_id) {
            return Err(StackError::DuplicateLogicalId { logical_id });
        }

        tracing::debug!(
            logical_id = %logical_id,
            resource_type = %resource.resource_type,
            path = %full_path,
            "declared resource"
        );

        resource.path = full_path.clone();
        self.paths.insert(full_path);
        self.resources.insert(logical_id.clone(), resource);
        Ok(logical_id)
    }

    pub fn contains(&self, logical_id: &str) -> bool {
        self.resources.contains_key(logical_id)
    }

    /// Fails unless `logical_id` was declared in this stack.
    pub fn require(&self, logical_id: &str) -> Result<(), StackError> {
        if self.contains(logical_id) {
            Ok(())
        } else {
            Err(self.foreign(logical_id))
        }
    }

    #[cfg(test)]
    pub fn resource(&self, logical_id: &str) -> Option<&Resource> {
        self.resources.get(logical_id)
    }

    pub fn resource_mut(&mut self, logical_id: &str) -> Result<&mut Resource, StackError> {
        let stack = self.name.clone();
        self.resources
            .get_mut(logical_id)
            .ok_or_else(|| StackError::ForeignReference {
                stack,
                logical_id: logical_id.to_owned(),
            })
    }

    pub fn resources(&self) -> impl Iterator<Item = (&String, &Resource)> {
        self.resources.iter()
    }

    pub fn add_output(
        &mut self,
        id: &str,
        value: Value,
        description: Option<String>,
    ) -> Result<String, StackError> {
        let name = logical_id::allocate(&[id])?;
        if self.outputs.contains_key(&name) || self.resources.contains_key(&name) {
            return Err(StackError::DuplicateOutput { name });
        }

        self.outputs.insert(name.clone(), Output { value, description });
        Ok(name)
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&String, &Output)> {
        self.outputs.iter()
    }

    pub fn synthesize(&self) -> Result<Template, StackError> {
        let mut template = Template {
            description: self.description.clone(),
            ..Template::default()
        };

        for (logical_id, resource) in &self.resources {
            template
                .resources
                .insert(logical_id.clone(), resource.render()?);
        }

        for (name, output) in &self.outputs {
            let mut rendered = Map::new();
            if let Some(description) = &output.description {
                rendered.insert("Description".into(), json!(description));
            }
            rendered.insert("Value".into(), output.value.clone());
            template.outputs.insert(name.clone(), Value::Object(rendered));
        }

        Ok(template)
    }

    fn full_path(&self, path: &[&str]) -> String {
        std::iter::once(self.name.as_str())
            .chain(path.iter().copied())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn foreign(&self, logical_id: &str) -> StackError {
        StackError::ForeignReference {
            stack: self.name.clone(),
            logical_id: logical_id.to_owned(),
        }
    }
}

fn validate_stack_name(name: &str) -> Result<(), StackError> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.len() > MAX_STACK_NAME_LEN {
        Some("must be at most 128 characters")
    } else if !name.starts_with(|ch: char| ch.is_ascii_alphabetic()) {
        Some("must start with a letter")
    } else if !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '-') {
        Some("may only contain letters, digits and hyphens")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StackError::InvalidStackName {
            name: name.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> Stack {
        Stack::new("SiteStack", StackEnv::default()).expect("stack should be created")
    }

    #[test]
    fn rejects_invalid_stack_names() {
        for name in ["", "1stack", "my_stack", "stack.name"] {
            assert!(
                matches!(
                    Stack::new(name, StackEnv::default()),
                    Err(StackError::InvalidStackName { .. })
                ),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn add_resource_records_full_construct_path() {
        let mut stack = stack();
        let id = stack
            .add_resource(&["site", "Resource"], Resource::new("AWS::S3::Bucket", Map::new()))
            .expect("resource should be added");

        let resource = stack.resource(&id).expect("resource should be registered");
        assert_eq!(resource.path, "SiteStack/site/Resource");
    }

    #[test]
    fn duplicate_paths_are_rejected() {
        let mut stack = stack();
        stack
            .add_resource(&["site"], Resource::new("AWS::S3::Bucket", Map::new()))
            .expect("first resource should be added");

        let error = stack
            .add_resource(&["site"], Resource::new("AWS::S3::Bucket", Map::new()))
            .expect_err("duplicate should be rejected");

        assert_eq!(
            error,
            StackError::DuplicateConstruct {
                path: "SiteStack/site".into()
            }
        );
    }

    #[test]
    fn colliding_logical_ids_are_rejected() {
        let mut stack = stack();
        stack
            .add_resource(&["my-site"], Resource::new("AWS::S3::Bucket", Map::new()))
            .expect("first resource should be added");

        let error = stack
            .add_resource(&["mysite"], Resource::new("AWS::S3::Bucket", Map::new()))
            .expect_err("collision should be rejected");

        assert!(matches!(error, StackError::DuplicateLogicalId { .. }));
    }

    #[test]
    fn unknown_resources_are_foreign() {
        let mut stack = stack();

        assert!(matches!(
            stack.require("Elsewhere"),
            Err(StackError::ForeignReference { .. })
        ));
        assert!(stack.resource_mut("Elsewhere").is_err());
    }

    #[test]
    fn account_falls_back_to_pseudo_parameter() {
        let unpinned = stack();
        let pinned = Stack::new(
            "SiteStack",
            StackEnv {
                account: Some("123456789012".into()),
                region: Some("ap-northeast-1".into()),
            },
        )
        .expect("stack should be created");

        assert_eq!(unpinned.account(), json!({ "Ref": "AWS::AccountId" }));
        assert_eq!(pinned.account(), json!("123456789012"));
        assert_eq!(pinned.env().describe(), "aws://123456789012/ap-northeast-1");
        assert_eq!(
            unpinned.env().describe(),
            "aws://unknown-account/unknown-region"
        );
    }

    #[test]
    fn synthesize_renders_resources_and_outputs() {
        let mut stack = stack();
        stack.set_description("static site");
        let id = stack
            .add_resource(&["site"], Resource::new("AWS::S3::Bucket", Map::new()))
            .expect("resource should be added");
        stack
            .add_output("site-name", reference(&id), None)
            .expect("output should be added");

        let template = stack.synthesize().expect("template should render");
        let document = template.to_json();

        assert_eq!(document["Description"], "static site");
        assert_eq!(document["Resources"]["site"]["Type"], "AWS::S3::Bucket");
        assert_eq!(document["Outputs"]["sitename"]["Value"], json!({ "Ref": "site" }));
    }

    #[test]
    fn duplicate_outputs_are_rejected() {
        let mut stack = stack();
        stack
            .add_output("url", json!("a"), None)
            .expect("output should be added");

        assert!(matches!(
            stack.add_output("url", json!("b"), None),
            Err(StackError::DuplicateOutput { .. })
        ));
    }
}
