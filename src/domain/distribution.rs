//! CloudFront distribution construct with a single S3 origin.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::{
    bucket::Bucket,
    error::StackError,
    stack::Stack,
    template::{get_att, join, reference, Resource},
};

pub const DISTRIBUTION_RESOURCE_TYPE: &str = "AWS::CloudFront::Distribution";
/// Managed "CachingOptimized" cache policy.
pub const CACHING_OPTIMIZED_POLICY_ID: &str = "658327ea-f89d-4fab-a63d-7e88639e58f6";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceClass {
    #[serde(rename = "PriceClass_100")]
    PriceClass100,
    #[serde(rename = "PriceClass_200")]
    PriceClass200,
    #[serde(rename = "PriceClass_All")]
    PriceClassAll,
}

impl PriceClass {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::PriceClass100 => "PriceClass_100",
            Self::PriceClass200 => "PriceClass_200",
            Self::PriceClassAll => "PriceClass_All",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerProtocolPolicy {
    AllowAll,
    RedirectToHttps,
    HttpsOnly,
}

impl ViewerProtocolPolicy {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::AllowAll => "allow-all",
            Self::RedirectToHttps => "redirect-to-https",
            Self::HttpsOnly => "https-only",
        }
    }
}

/// Origin backed by an S3 bucket's regional endpoint.
///
/// `S3OriginConfig` renders empty; access is granted by attaching an origin
/// access control through property overrides.
#[derive(Debug, Clone)]
pub struct S3Origin<'a> {
    pub bucket: &'a Bucket,
    pub origin_id: String,
}

impl<'a> S3Origin<'a> {
    pub fn new(bucket: &'a Bucket, origin_id: impl Into<String>) -> Self {
        Self {
            bucket,
            origin_id: origin_id.into(),
        }
    }

    fn render(&self) -> Value {
        json!({
            "DomainName": self.bucket.regional_domain_name(),
            "Id": self.origin_id,
            "S3OriginConfig": {},
        })
    }
}

#[derive(Debug, Clone)]
pub struct DistributionProps<'a> {
    pub comment: Option<String>,
    pub default_root_object: Option<String>,
    pub price_class: PriceClass,
    pub origin: S3Origin<'a>,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub log_bucket: Option<&'a Bucket>,
    pub enable_logging: bool,
    pub log_includes_cookies: bool,
    pub log_file_prefix: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    logical_id: String,
}

impl Distribution {
    pub fn new(
        stack: &mut Stack,
        id: &str,
        props: DistributionProps<'_>,
    ) -> Result<Self, StackError> {
        stack.require(props.origin.bucket.logical_id())?;

        let mut config = Map::new();
        config.insert("Enabled".into(), json!(true));
        config.insert("HttpVersion".into(), json!("http2"));
        config.insert("IPV6Enabled".into(), json!(true));
        config.insert("PriceClass".into(), json!(props.price_class.as_label()));
        if let Some(comment) = &props.comment {
            config.insert("Comment".into(), json!(comment));
        }
        if let Some(root) = &props.default_root_object {
            config.insert("DefaultRootObject".into(), json!(root));
        }
        config.insert("Origins".into(), json!([props.origin.render()]));
        config.insert(
            "DefaultCacheBehavior".into(),
            json!({
                "CachePolicyId": CACHING_OPTIMIZED_POLICY_ID,
                "Compress": true,
                "TargetOriginId": props.origin.origin_id,
                "ViewerProtocolPolicy": props.viewer_protocol_policy.as_label(),
            }),
        );

        if props.enable_logging {
            let log_bucket = props.log_bucket.ok_or(StackError::MissingRequired {
                construct: "Distribution",
                what: "log bucket when logging is enabled",
            })?;
            stack.require(log_bucket.logical_id())?;

            let mut logging = Map::new();
            logging.insert("Bucket".into(), log_bucket.regional_domain_name());
            logging.insert("IncludeCookies".into(), json!(props.log_includes_cookies));
            if let Some(prefix) = &props.log_file_prefix {
                logging.insert("Prefix".into(), json!(prefix));
            }
            config.insert("Logging".into(), Value::Object(logging));
        }

        let mut properties = Map::new();
        properties.insert("DistributionConfig".into(), Value::Object(config));

        let logical_id = stack.add_resource(
            &[id, "Resource"],
            Resource::new(DISTRIBUTION_RESOURCE_TYPE, properties),
        )?;

        Ok(Self { logical_id })
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// Resolves to the distribution id.
    pub fn distribution_id(&self) -> Value {
        reference(&self.logical_id)
    }

    pub fn domain_name(&self) -> Value {
        get_att(&self.logical_id, "DomainName")
    }

    pub fn arn(&self, stack: &Stack) -> Value {
        join(
            "",
            vec![
                json!("arn:aws:cloudfront::"),
                stack.account(),
                json!(":distribution/"),
                self.distribution_id(),
            ],
        )
    }

    pub fn add_property_override(
        &self,
        stack: &mut Stack,
        path: &str,
        value: Value,
    ) -> Result<(), StackError> {
        stack
            .resource_mut(&self.logical_id)?
            .add_property_override(path, value);
        Ok(())
    }
}
