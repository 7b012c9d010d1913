use crate::domain::stack::Stack;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRow {
    pub logical_id: String,
    pub resource_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceListing {
    pub resources: Vec<ResourceRow>,
    pub outputs: Vec<String>,
}

impl ResourceListing {
    pub fn lines(&self) -> Vec<String> {
        self.resources
            .iter()
            .map(|row| format!("{}\t{}", row.logical_id, row.resource_type))
            .chain(self.outputs.iter().map(|name| format!("{name}\tOutput")))
            .collect()
    }
}

/// Resources sorted by logical id, followed by output names.
pub fn list_resources(stack: &Stack) -> ResourceListing {
    let resources = stack
        .resources()
        .map(|(logical_id, resource)| ResourceRow {
            logical_id: logical_id.clone(),
            resource_type: resource.resource_type.clone(),
        })
        .collect();
    let outputs = stack.outputs().map(|(name, _)| name.clone()).collect();

    ResourceListing { resources, outputs }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::asset::FileAsset,
        infra::config::AppConfig,
        usecases::site_stack::{define, SiteStackProps},
    };

    #[test]
    fn lists_every_declared_resource_in_logical_id_order() {
        let site = define(
            &SiteStackProps::from_config(&AppConfig::default()),
            FileAsset::directory("c0ffee", "../web"),
        )
        .expect("stack should be defined");

        let listing = list_resources(&site.stack);

        assert_eq!(listing.resources.len(), 8);
        assert!(listing
            .resources
            .windows(2)
            .all(|pair| pair[0].logical_id < pair[1].logical_id));
        assert_eq!(listing.outputs, vec!["cloudfrontdomainname".to_owned()]);

        let lines = listing.lines();
        assert_eq!(lines.len(), 9);
        assert!(lines.iter().any(|line| line.ends_with("\tAWS::CloudFront::Distribution")));
        assert_eq!(lines.last().map(String::as_str), Some("cloudfrontdomainname\tOutput"));
    }
}
