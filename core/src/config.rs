//! Per-dapp settings fixed at startup.

/// Settings injected into a `FilesApi` when it is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DappConfig {
    /// Name of the only resource collection the dapp serves.
    pub resource: String,
    /// Address of the contract the dapp registers file names with.
    pub root_contract: String,
}

pub const DEFAULT_RESOURCE: &str = "files";
pub const DEFAULT_ROOT_CONTRACT: &str = "0x0000000000000000000000000000000000000000";

impl Default for DappConfig {
    fn default() -> Self {
        Self {
            resource: DEFAULT_RESOURCE.to_string(),
            root_contract: DEFAULT_ROOT_CONTRACT.to_string(),
        }
    }
}

impl DappConfig {
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = resource.into();
        self
    }

    pub fn with_root_contract(mut self, root_contract: impl Into<String>) -> Self {
        self.root_contract = root_contract.into();
        self
    }
}
