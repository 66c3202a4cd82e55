use mc_domain::contract::ContractStructure;

/// Render a contract as the labelled block shown in the chat.
pub fn format_contract_for_display(contract: &ContractStructure) -> String {
    let this = match &contract.this {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    format!(
        "**Quem:** {}\n**Fez:** {}\n**O que:** {}\n**Quando:** {}\n**Se ok:** {}\n**Se não:** {}",
        contract.who.join(", "),
        contract.did,
        this,
        contract.when,
        contract.if_ok,
        contract.if_not,
    )
}
