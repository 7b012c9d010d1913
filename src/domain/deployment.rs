//! One-shot upload of staged assets into a destination bucket.

use serde_json::{json, Map, Value};

use crate::domain::{
    asset::FileAsset,
    bucket::Bucket,
    error::StackError,
    handler::HandlerFunction,
    stack::Stack,
    template::{RemovalPolicy, Resource},
};

pub const BUCKET_DEPLOYMENT_RESOURCE_TYPE: &str = "Custom::BucketDeployment";

#[derive(Debug, Clone)]
pub struct BucketDeploymentProps<'a> {
    pub sources: Vec<FileAsset>,
    pub destination: &'a Bucket,
    /// Bucket the asset publisher uploads staged assets to.
    pub asset_bucket: Value,
    pub handler: HandlerFunction,
    pub prune: bool,
    pub destination_key_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketDeployment {
    logical_id: String,
}

impl BucketDeployment {
    pub fn new(
        stack: &mut Stack,
        id: &str,
        props: BucketDeploymentProps<'_>,
    ) -> Result<Self, StackError> {
        if props.sources.is_empty() {
            return Err(StackError::MissingRequired {
                construct: "BucketDeployment",
                what: "source asset",
            });
        }
        stack.require(props.destination.logical_id())?;

        let object_keys: Vec<String> = props.sources.iter().map(FileAsset::object_key).collect();
        let source_buckets: Vec<Value> = props
            .sources
            .iter()
            .map(|_| props.asset_bucket.clone())
            .collect();

        let mut properties = Map::new();
        properties.insert("ServiceToken".into(), props.handler.service_token());
        properties.insert("SourceBucketNames".into(), json!(source_buckets));
        properties.insert("SourceObjectKeys".into(), json!(object_keys));
        properties.insert(
            "DestinationBucketName".into(),
            props.destination.reference(),
        );
        properties.insert("Prune".into(), json!(props.prune));
        if let Some(prefix) = &props.destination_key_prefix {
            properties.insert("DestinationBucketKeyPrefix".into(), json!(prefix));
        }

        let logical_id = stack.add_resource(
            &[id, "CustomResource", "Default"],
            Resource::new(BUCKET_DEPLOYMENT_RESOURCE_TYPE, properties)
                .with_removal_policy(RemovalPolicy::Destroy),
        )?;

        Ok(Self { logical_id })
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{bucket::BucketProps, stack::StackEnv};

    fn props(destination: &Bucket, sources: Vec<FileAsset>) -> BucketDeploymentProps<'_> {
        BucketDeploymentProps {
            sources,
            destination,
            asset_bucket: json!("site-assets"),
            handler: HandlerFunction::new("site-bucket-deployment"),
            prune: true,
            destination_key_prefix: None,
        }
    }

    #[test]
    fn renders_sources_and_destination() {
        let mut stack = Stack::new("SiteStack", StackEnv::default()).expect("stack");
        let bucket = Bucket::new(&mut stack, "site-bucket", BucketProps::named("site-bucket"))
            .expect("bucket should be declared");

        let deployment = BucketDeployment::new(
            &mut stack,
            "DeployWebsite",
            props(&bucket, vec![FileAsset::directory("feedbeef", "../web")]),
        )
        .expect("deployment should be declared");

        let rendered = stack
            .resource(deployment.logical_id())
            .expect("deployment should exist")
            .render()
            .expect("deployment should render");

        assert!(deployment.logical_id().starts_with("DeployWebsiteCustomResource"));
        assert_eq!(rendered["Type"], BUCKET_DEPLOYMENT_RESOURCE_TYPE);
        assert_eq!(rendered["Properties"]["SourceBucketNames"], json!(["site-assets"]));
        assert_eq!(rendered["Properties"]["SourceObjectKeys"], json!(["feedbeef.zip"]));
        assert_eq!(rendered["Properties"]["DestinationBucketName"], bucket.reference());
        assert_eq!(rendered["Properties"]["Prune"], true);
    }

    #[test]
    fn requires_at_least_one_source() {
        let mut stack = Stack::new("SiteStack", StackEnv::default()).expect("stack");
        let bucket = Bucket::new(&mut stack, "site-bucket", BucketProps::named("site-bucket"))
            .expect("bucket should be declared");

        assert!(matches!(
            BucketDeployment::new(&mut stack, "DeployWebsite", props(&bucket, Vec::new())),
            Err(StackError::MissingRequired { .. })
        ));
    }
}
