use std::path::PathBuf;

use anyhow::Result;
use serde_json::{json, Value};

use crate::{
    infra::{asset_staging, contracts::CloudAssembly},
    usecases::{
        context::AppContext,
        site_stack::{self, SiteStack, SiteStackProps},
    },
};

pub const ASSEMBLY_VERSION: &str = "1";
pub const MANIFEST_FILE: &str = "manifest.json";
const CURRENT_ENV_DESTINATION: &str = "current_account-current_region";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthReport {
    pub out_dir: PathBuf,
    pub template_file: PathBuf,
    pub asset_hash: String,
    pub resource_count: usize,
    pub origin_bucket: String,
    /// Name of the stack output carrying the site URL.
    pub domain_output: String,
}

/// Fingerprints the site assets and builds the stack without writing anything.
pub fn build_stack(context: &AppContext) -> Result<SiteStack> {
    let asset = asset_staging::fingerprint(&context.config.site.asset_dir)?;
    let props = SiteStackProps::from_config(&context.config);
    Ok(site_stack::define(&props, asset)?)
}

pub fn synthesize(context: &AppContext, assembly: &mut dyn CloudAssembly) -> Result<SynthReport> {
    let site = build_stack(context)?;
    let stack_name = site.stack.name().to_owned();

    let template = site.stack.synthesize()?;
    assembly.stage_asset(&site.asset)?;

    let template_name = template_file_name(&stack_name);
    let assets_name = assets_file_name(&stack_name);

    let asset_bucket = context
        .config
        .assets
        .bucket_or_default(&context.config.stack.prefix);

    let template_file = assembly.write_json(&template_name, &template.to_json())?;
    assembly.write_json(&assets_name, &asset_manifest(&site, &asset_bucket))?;
    assembly.write_json(
        MANIFEST_FILE,
        &assembly_manifest(&site, &template_name, &assets_name),
    )?;

    let report = SynthReport {
        out_dir: assembly.out_dir().to_path_buf(),
        template_file,
        asset_hash: site.asset.hash.clone(),
        resource_count: template.resources.len(),
        origin_bucket: site.origin_bucket.bucket_name().to_owned(),
        domain_output: site.domain_output.clone(),
    };

    tracing::info!(
        stack = %stack_name,
        out_dir = %report.out_dir.display(),
        resources = report.resource_count,
        asset = %report.asset_hash,
        "synthesized assembly"
    );
    tracing::debug!(
        distribution = %site.distribution.logical_id(),
        access_control = %site.access_control.logical_id(),
        deployment = %site.deployment.logical_id(),
        log_bucket = %site.log_bucket.bucket_name(),
        "assembly contents"
    );

    Ok(report)
}

pub fn template_file_name(stack_name: &str) -> String {
    format!("{stack_name}.template.json")
}

pub fn assets_file_name(stack_name: &str) -> String {
    format!("{stack_name}.assets.json")
}

fn asset_manifest(site: &SiteStack, asset_bucket: &str) -> Value {
    let asset = &site.asset;
    json!({
        "version": ASSEMBLY_VERSION,
        "files": {
            asset.hash.clone(): {
                "source": {
                    "path": asset.staged_name(),
                    "packaging": asset.packaging.as_label(),
                },
                "destinations": {
                    CURRENT_ENV_DESTINATION: {
                        "bucketName": asset_bucket,
                        "objectKey": asset.object_key(),
                    }
                }
            }
        }
    })
}

fn assembly_manifest(site: &SiteStack, template_name: &str, assets_name: &str) -> Value {
    let stack_name = site.stack.name();
    let assets_artifact = format!("{stack_name}.assets");

    json!({
        "version": ASSEMBLY_VERSION,
        "artifacts": {
            assets_artifact.clone(): {
                "type": "asset-manifest",
                "properties": { "file": assets_name },
            },
            stack_name: {
                "type": "aws:cloudformation:stack",
                "environment": site.stack.env().describe(),
                "properties": { "templateFile": template_name },
                "dependencies": [assets_artifact],
            }
        }
    })
}
