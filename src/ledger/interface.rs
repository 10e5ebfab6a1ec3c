//! Contract interface descriptors.
//!
//! A descriptor lists the entrypoints a contract exposes. Descriptors come
//! either from the ledger (the contract class ABI) or are bundled with the
//! crate, as for the fungible balance contract.

use serde_json::Value;

use super::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    View,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl Param {
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPoint {
    pub name: String,
    pub inputs: Vec<Param>,
    pub outputs: Vec<String>,
    pub mutability: Mutability,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractInterface {
    entrypoints: Vec<EntryPoint>,
}

impl ContractInterface {
    pub fn new(entrypoints: Vec<EntryPoint>) -> Self {
        Self { entrypoints }
    }

    pub fn entrypoint(&self, name: &str) -> Option<&EntryPoint> {
        self.entrypoints.iter().find(|e| e.name == name)
    }

    pub fn entrypoints(&self) -> &[EntryPoint] {
        &self.entrypoints
    }

    /// The ERC-20 surface of the fungible balance contract.
    pub fn erc20() -> Self {
        const U256_TY: &str = "Uint256";
        let view = |name: &str, inputs: Vec<Param>, outputs: &[&str]| EntryPoint {
            name: name.to_string(),
            inputs,
            outputs: outputs.iter().map(|o| o.to_string()).collect(),
            mutability: Mutability::View,
        };
        let external = |name: &str, inputs: Vec<Param>| EntryPoint {
            name: name.to_string(),
            inputs,
            outputs: vec!["felt".to_string()],
            mutability: Mutability::External,
        };

        Self::new(vec![
            view("name", vec![], &["felt"]),
            view("symbol", vec![], &["felt"]),
            view("decimals", vec![], &["felt"]),
            view("totalSupply", vec![], &[U256_TY]),
            view("balanceOf", vec![Param::new("account", "felt")], &[U256_TY]),
            view(
                "allowance",
                vec![Param::new("owner", "felt"), Param::new("spender", "felt")],
                &[U256_TY],
            ),
            external(
                "transfer",
                vec![Param::new("recipient", "felt"), Param::new("amount", U256_TY)],
            ),
            external(
                "transferFrom",
                vec![
                    Param::new("sender", "felt"),
                    Param::new("recipient", "felt"),
                    Param::new("amount", U256_TY),
                ],
            ),
            external(
                "approve",
                vec![Param::new("spender", "felt"), Param::new("amount", U256_TY)],
            ),
        ])
    }

    /// Parses a contract class ABI as returned by the node.
    ///
    /// Accepts both the Sierra layout (functions nested in `interface` items,
    /// `state_mutability`) and the legacy Cairo 0 layout (`stateMutability`).
    pub fn from_abi_json(abi: &str) -> Result<Self, LedgerError> {
        let parsed: Value = serde_json::from_str(abi).map_err(|e| LedgerError::MalformedResponse {
            operation: "get_contract_interface".to_string(),
            message: e.to_string(),
        })?;
        Self::from_abi_value(&parsed)
    }

    pub fn from_abi_value(abi: &Value) -> Result<Self, LedgerError> {
        let items = abi.as_array().ok_or_else(|| LedgerError::MalformedResponse {
            operation: "get_contract_interface".to_string(),
            message: "ABI is not an array".to_string(),
        })?;

        let mut entrypoints = Vec::new();
        collect_functions(items, &mut entrypoints);
        Ok(Self::new(entrypoints))
    }
}

fn collect_functions(items: &[Value], out: &mut Vec<EntryPoint>) {
    for item in items {
        match item.get("type").and_then(Value::as_str) {
            Some("function") => {
                if let Some(entrypoint) = parse_function(item) {
                    out.push(entrypoint);
                }
            }
            Some("interface") => {
                if let Some(nested) = item.get("items").and_then(Value::as_array) {
                    collect_functions(nested, out);
                }
            }
            _ => {}
        }
    }
}

fn parse_function(item: &Value) -> Option<EntryPoint> {
    let name = item.get("name")?.as_str()?.to_string();

    let inputs = item
        .get("inputs")
        .and_then(Value::as_array)
        .map(|inputs| {
            inputs
                .iter()
                .map(|input| Param {
                    name: field(input, "name"),
                    ty: field(input, "type"),
                })
                .collect()
        })
        .unwrap_or_default();

    let outputs = item
        .get("outputs")
        .and_then(Value::as_array)
        .map(|outputs| outputs.iter().map(|output| field(output, "type")).collect())
        .unwrap_or_default();

    let mutability = item
        .get("state_mutability")
        .or_else(|| item.get("stateMutability"))
        .and_then(Value::as_str);
    let mutability = match mutability {
        Some("view") => Mutability::View,
        _ => Mutability::External,
    };

    Some(EntryPoint {
        name,
        inputs,
        outputs,
        mutability,
    })
}

fn field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
