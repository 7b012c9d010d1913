//! The static site stack: origin bucket, log bucket, and a CloudFront
//! distribution that reaches the origin through an origin access control.

use serde_json::json;

use crate::{
    domain::{
        access_control::{
            OriginAccessControl, OriginAccessControlProps, OriginType, SigningBehavior,
            SigningProtocol,
        },
        asset::FileAsset,
        bucket::{Bucket, BucketProps, ObjectOwnership},
        deployment::{BucketDeployment, BucketDeploymentProps},
        distribution::{
            Distribution, DistributionProps, PriceClass, S3Origin, ViewerProtocolPolicy,
        },
        handler::HandlerFunction,
        policy::{PolicyStatement, Principal},
        stack::{Stack, StackEnv},
        template::{join, sub, RemovalPolicy},
        StackError,
    },
    infra::config::AppConfig,
};

pub const DEPLOYMENT_ID: &str = "DeployWebsite";
pub const DOMAIN_OUTPUT_ID: &str = "cloudfront-domain-name";
pub const READ_STATEMENT_SID: &str = "AllowCloudFrontServicePrincipal";
pub const CLOUDFRONT_SERVICE_PRINCIPAL: &str = "cloudfront.amazonaws.com";
pub const LEGACY_IDENTITY_OVERRIDE: &str =
    "DistributionConfig.Origins.0.S3OriginConfig.OriginAccessIdentity";
pub const ACCESS_CONTROL_OVERRIDE: &str = "DistributionConfig.Origins.0.OriginAccessControlId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteStackProps {
    pub stack_name: String,
    pub prefix: String,
    pub env: StackEnv,
    pub default_root_object: String,
    pub price_class: PriceClass,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub log_includes_cookies: bool,
    pub auto_delete_handler: HandlerFunction,
    pub deployment_handler: HandlerFunction,
    pub asset_bucket: String,
}

impl SiteStackProps {
    pub fn from_config(config: &AppConfig) -> Self {
        let prefix = config.stack.prefix.clone();

        Self {
            stack_name: config.stack.name.clone(),
            env: StackEnv {
                account: config.stack.account.clone(),
                region: config.stack.region.clone(),
            },
            default_root_object: config.site.default_root_object.clone(),
            price_class: config.site.price_class,
            viewer_protocol_policy: config.site.viewer_protocol_policy,
            log_includes_cookies: config.site.log_includes_cookies,
            auto_delete_handler: HandlerFunction::new(
                config.handlers.auto_delete_objects_or_default(&prefix),
            ),
            deployment_handler: HandlerFunction::new(
                config.handlers.bucket_deployment_or_default(&prefix),
            ),
            asset_bucket: config.assets.bucket_or_default(&prefix),
            prefix,
        }
    }

    fn name(&self, suffix: &str) -> String {
        format!("{}-{suffix}", self.prefix)
    }
}

#[derive(Debug, Clone)]
pub struct SiteStack {
    pub stack: Stack,
    pub origin_bucket: Bucket,
    pub log_bucket: Bucket,
    pub distribution: Distribution,
    pub access_control: OriginAccessControl,
    pub deployment: BucketDeployment,
    pub asset: FileAsset,
    pub domain_output: String,
}

pub fn define(props: &SiteStackProps, asset: FileAsset) -> Result<SiteStack, StackError> {
    let mut stack = Stack::new(&props.stack_name, props.env.clone())?;
    stack.set_description(format!(
        "Static site served by CloudFront from S3 ({})",
        props.prefix
    ));

    let mut origin_bucket = create_origin_bucket(&mut stack, props)?;
    let log_bucket = create_logging_bucket(&mut stack, props)?;
    let (distribution, access_control) =
        create_distribution(&mut stack, props, &origin_bucket, &log_bucket)?;

    add_to_resource_policy(&mut stack, &mut origin_bucket, &distribution)?;
    let deployment = deploy_to(&mut stack, props, &origin_bucket, &asset)?;

    let domain_output = stack.add_output(
        DOMAIN_OUTPUT_ID,
        join("", vec![json!("https://"), distribution.domain_name()]),
        Some("Public URL of the CloudFront distribution".to_owned()),
    )?;

    tracing::info!(
        stack = %stack.name(),
        prefix = %props.prefix,
        distribution = %distribution.logical_id(),
        "site stack defined"
    );

    Ok(SiteStack {
        stack,
        origin_bucket,
        log_bucket,
        distribution,
        access_control,
        deployment,
        asset,
        domain_output,
    })
}

fn create_origin_bucket(stack: &mut Stack, props: &SiteStackProps) -> Result<Bucket, StackError> {
    let bucket_name = props.name("front-origin-bucket");
    Bucket::new(
        stack,
        &bucket_name,
        BucketProps {
            versioned: true,
            removal_policy: RemovalPolicy::Destroy,
            auto_delete_objects: Some(props.auto_delete_handler.clone()),
            ..BucketProps::named(bucket_name.clone())
        },
    )
}

// CloudFront standard logging writes through ACLs, so the bucket owner must be preferred.
fn create_logging_bucket(stack: &mut Stack, props: &SiteStackProps) -> Result<Bucket, StackError> {
    let bucket_name = props.name("front-log-bucket");
    Bucket::new(
        stack,
        &bucket_name,
        BucketProps {
            versioned: true,
            removal_policy: RemovalPolicy::Destroy,
            auto_delete_objects: Some(props.auto_delete_handler.clone()),
            object_ownership: Some(ObjectOwnership::BucketOwnerPreferred),
            ..BucketProps::named(bucket_name.clone())
        },
    )
}

fn create_distribution(
    stack: &mut Stack,
    props: &SiteStackProps,
    origin_bucket: &Bucket,
    log_bucket: &Bucket,
) -> Result<(Distribution, OriginAccessControl), StackError> {
    let distribution_name = props.name("front-distribution");
    let distribution = Distribution::new(
        stack,
        &distribution_name,
        DistributionProps {
            comment: Some(distribution_name.clone()),
            default_root_object: Some(props.default_root_object.clone()),
            price_class: props.price_class,
            origin: S3Origin::new(origin_bucket, props.name("front-origin")),
            viewer_protocol_policy: props.viewer_protocol_policy,
            log_bucket: Some(log_bucket),
            enable_logging: true,
            log_includes_cookies: props.log_includes_cookies,
            log_file_prefix: None,
        },
    )?;

    let access_control_name = props.name("front-origin-access-control");
    let access_control = OriginAccessControl::new(
        stack,
        &access_control_name,
        OriginAccessControlProps {
            name: access_control_name.clone(),
            origin_type: OriginType::S3,
            signing_behavior: SigningBehavior::Always,
            signing_protocol: SigningProtocol::SigV4,
            description: Some("Access Control".to_owned()),
        },
    )?;

    // Blank the legacy identity, then point the origin at the access control.
    distribution.add_property_override(stack, LEGACY_IDENTITY_OVERRIDE, json!(""))?;
    distribution.add_property_override(stack, ACCESS_CONTROL_OVERRIDE, access_control.attr_id())?;

    Ok((distribution, access_control))
}

fn add_to_resource_policy(
    stack: &mut Stack,
    origin_bucket: &mut Bucket,
    distribution: &Distribution,
) -> Result<(), StackError> {
    let statement = PolicyStatement::allow()
        .with_sid(READ_STATEMENT_SID)
        .with_principal(Principal::service(CLOUDFRONT_SERVICE_PRINCIPAL))
        .with_action("s3:GetObject")
        .with_resource(origin_bucket.arn_for_objects("*"))
        .with_condition("StringEquals", "AWS:SourceArn", distribution.arn(stack));

    origin_bucket.add_to_resource_policy(stack, statement)
}

fn deploy_to(
    stack: &mut Stack,
    props: &SiteStackProps,
    origin_bucket: &Bucket,
    asset: &FileAsset,
) -> Result<BucketDeployment, StackError> {
    BucketDeployment::new(
        stack,
        DEPLOYMENT_ID,
        BucketDeploymentProps {
            sources: vec![asset.clone()],
            destination: origin_bucket,
            asset_bucket: sub(&props.asset_bucket),
            handler: props.deployment_handler.clone(),
            prune: true,
            destination_key_prefix: None,
        },
    )
}
