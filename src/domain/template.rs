//! CloudFormation template model and intrinsic function helpers.

use std::collections::BTreeMap;

use serde_json::{json, Map, Value};

use crate::domain::{error::StackError, overrides};

pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";
pub const PATH_METADATA_KEY: &str = "construct:path";

pub fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

pub fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

pub fn join(delimiter: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [delimiter, parts] })
}

pub fn sub(template: &str) -> Value {
    json!({ "Fn::Sub": template })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalPolicy {
    Destroy,
    Retain,
}

impl RemovalPolicy {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Destroy => "Delete",
            Self::Retain => "Retain",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub resource_type: String,
    pub properties: Map<String, Value>,
    pub depends_on: Vec<String>,
    pub removal_policy: Option<RemovalPolicy>,
    pub path: String,
    overrides: Vec<(String, Value)>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self {
            resource_type: resource_type.into(),
            properties,
            depends_on: Vec::new(),
            removal_policy: None,
            path: String::new(),
            overrides: Vec::new(),
        }
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = Some(policy);
        self
    }

    pub fn add_dependency(&mut self, logical_id: &str) {
        if !self.depends_on.iter().any(|existing| existing == logical_id) {
            self.depends_on.push(logical_id.to_owned());
        }
    }

    /// Records a raw override applied on top of the generated properties.
    ///
    /// `path` is dotted and relative to `Properties`; numeric segments index
    /// into arrays. Later overrides win over earlier ones.
    pub fn add_property_override(&mut self, path: &str, value: Value) {
        self.overrides.push((path.to_owned(), value));
    }

    pub fn rendered_properties(&self) -> Result<Value, StackError> {
        let mut properties = Value::Object(self.properties.clone());
        for (path, value) in &self.overrides {
            overrides::apply(&mut properties, path, value.clone())?;
        }
        Ok(properties)
    }

    pub fn render(&self) -> Result<Value, StackError> {
        let mut rendered = Map::new();
        rendered.insert("Type".into(), Value::String(self.resource_type.clone()));

        let properties = self.rendered_properties()?;
        if properties.as_object().is_some_and(|props| !props.is_empty()) {
            rendered.insert("Properties".into(), properties);
        }

        if !self.depends_on.is_empty() {
            rendered.insert("DependsOn".into(), json!(self.depends_on));
        }

        if let Some(policy) = self.removal_policy {
            rendered.insert("UpdateReplacePolicy".into(), json!(policy.as_label()));
            rendered.insert("DeletionPolicy".into(), json!(policy.as_label()));
        }

        rendered.insert(
            "Metadata".into(),
            json!({ PATH_METADATA_KEY: self.path }),
        );

        Ok(Value::Object(rendered))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub value: Value,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template {
    pub description: Option<String>,
    pub resources: BTreeMap<String, Value>,
    pub outputs: BTreeMap<String, Value>,
}

impl Template {
    pub fn to_json(&self) -> Value {
        let mut document = Map::new();
        document.insert(
            "AWSTemplateFormatVersion".into(),
            json!(TEMPLATE_FORMAT_VERSION),
        );
        if let Some(description) = &self.description {
            document.insert("Description".into(), json!(description));
        }
        document.insert("Resources".into(), json!(self.resources));
        if !self.outputs.is_empty() {
            document.insert("Outputs".into(), json!(self.outputs));
        }
        Value::Object(document)
    }
}
