use anyhow::Result;

use crate::{
    cli::{Cli, Command},
    domain, infra,
    infra::assembly::FsCloudAssembly,
    usecases::{self, bootstrap, list_resources::list_resources, synth},
};

pub fn run(cli: Cli) -> Result<()> {
    let context = bootstrap::bootstrap(cli.config.as_deref())?;

    tracing::debug!(
        domain = domain::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match cli.command_or_default() {
        Command::Synth { out } => {
            let out_dir = out.unwrap_or_else(|| context.config.synth.out_dir.clone());
            let mut assembly = FsCloudAssembly::create(&out_dir)?;
            let report = synth::synthesize(&context, &mut assembly)?;

            println!(
                "Synthesized {} resources to {}",
                report.resource_count,
                report.out_dir.display()
            );
            println!("Template: {}", report.template_file.display());
            println!("Origin bucket: {}", report.origin_bucket);
            println!("Output: {}", report.domain_output);
        }
        Command::List => {
            let site = synth::build_stack(&context)?;
            for line in list_resources(&site.stack).lines() {
                println!("{line}");
            }
        }
    }

    Ok(())
}
