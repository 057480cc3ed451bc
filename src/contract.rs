use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{
    dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt},
    json_abi::{Function, JsonAbi},
    primitives::Address,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    client::ChainReader,
    error::{ConfigError, DataError, Result},
};

/// Interface file contents: a bare ABI array or a build artifact carrying one.
#[derive(Deserialize)]
#[serde(untagged)]
enum Descriptor {
    Abi(JsonAbi),
    Artifact { abi: JsonAbi },
}

impl From<Descriptor> for JsonAbi {
    fn from(descriptor: Descriptor) -> Self {
        match descriptor {
            Descriptor::Abi(abi) | Descriptor::Artifact { abi } => abi,
        }
    }
}

/// A contract address paired with the interface loaded for it.
#[derive(Debug)]
pub struct ContractHandle {
    address: Address,
    abi: JsonAbi,
    path: PathBuf,
}

pub fn load_contract(
    address: Address,
    path: impl AsRef<Path>,
) -> Result<ContractHandle, ConfigError> {
    let path = path.as_ref().to_path_buf();
    let content = fs::read_to_string(&path).map_err(|source| ConfigError::DescriptorRead {
        path: path.clone(),
        source,
    })?;
    let descriptor: Descriptor =
        serde_json::from_str(&content).map_err(|source| ConfigError::DescriptorParse {
            path: path.clone(),
            source,
        })?;

    Ok(ContractHandle {
        address,
        abi: descriptor.into(),
        path,
    })
}

impl ContractHandle {
    pub fn address(&self) -> Address {
        self.address
    }

    /// Fails unless every function in `names` is declared by the interface.
    pub fn require(&self, names: &[&str]) -> Result<(), ConfigError> {
        for name in names {
            if self.abi.function(name).is_none_or(|overloads| overloads.is_empty()) {
                return Err(self.missing(name));
            }
        }
        Ok(())
    }

    /// Calls the view function `name` directly, outside of any batch.
    pub async fn call(
        &self,
        reader: &impl ChainReader,
        name: &str,
        args: &[DynSolValue],
    ) -> Result<Vec<DynSolValue>> {
        let function = self.function(name, args.len())?;
        let abi_error = |source| DataError::Abi {
            function: function.signature(),
            source,
        };

        let input = function.abi_encode_input(args).map_err(abi_error)?;
        debug!(contract = %self.address, function = %function.signature(), "Direct call");
        let output = reader.call(self.address, input.into()).await?;

        Ok(function.abi_decode_output(&output, true).map_err(abi_error)?)
    }

    fn function(&self, name: &str, arity: usize) -> Result<&Function, ConfigError> {
        self.abi
            .function(name)
            .and_then(|overloads| overloads.iter().find(|f| f.inputs.len() == arity))
            .ok_or_else(|| self.missing(name))
    }

    fn missing(&self, name: &str) -> ConfigError {
        ConfigError::MissingFunction {
            path: self.path.clone(),
            function: name.to_string(),
        }
    }
}
