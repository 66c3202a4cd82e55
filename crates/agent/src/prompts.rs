//! Fixed prompts sent to the model.

use std::collections::HashSet;

/// System prompt for every agent turn.
pub const SYSTEM_PROMPT: &str = "\
Você é o assistente do Minicontratos, o caderno de registros de pequenos negócios.

Seu trabalho é transformar o que o usuário conta em registros concretos. Você pode:
1. create_flow: criar um flow (categoria) novo, como Vendas ou Estoque
2. register_contract: registrar um contrato dentro de um flow
3. search_contracts: procurar contratos já registrados, com filtros
4. get_flows: listar os flows do usuário
5. render_chart: montar um gráfico a partir de dados

Um contrato tem:
- who: lista das pessoas ou empresas envolvidas
- did: a ação principal
- this: o objeto ou o resultado (valores, itens, quantidades)
- when: data e hora em ISO 8601
- if_ok: o que acontece se o combinado for cumprido
- if_not: o que acontece se não for

Exemplos:
- \"Cria um flow de Vendas\" → create_flow com name=\"Vendas\", description=\"Registros de vendas\", icon=\"💰\"
- \"A Ana pagou 60 euros hoje\" → register_contract no flow certo, com os campos preenchidos
- \"O que vendi ontem?\" → search_contracts com date_from e date_to
- \"Quantos registros eu tenho?\" → search_contracts e conte o resultado

Use as ferramentas sempre que fizer sentido, confirme ações importantes e responda \
em tom natural. Tudo o que você registrar fica auditável no LogLine.";

/// Classifies a message into one or more flow labels.
pub const ROUTER_PROMPT: &str = "\
Classifique a mensagem do usuário em um ou mais flows.

Flows:
- flow#estoque: produtos, inventário, reposição, itens em falta
- flow#financeiro: dinheiro, pagamentos, dívidas, transações
- flow#relacionamento: clientes, feedback, satisfação ou reclamação
- flow#operacional: entregas, processos, logística
- flow#geral: o que não couber nos anteriores

Regras: um evento pode cair em vários flows; devolva sempre pelo menos um; prefira o mais específico.

Responda só com um array JSON, por exemplo: [\"flow#estoque\", \"flow#financeiro\"]";

/// Flow labels the router may answer with.
pub const FLOW_LABELS: [&str; 5] = [
    "flow#estoque",
    "flow#financeiro",
    "flow#relacionamento",
    "flow#operacional",
    "flow#geral",
];

/// Read a router answer. Unknown labels are dropped; an answer with no
/// usable label falls back to `flow#geral`.
pub fn parse_flow_labels(answer: &str) -> Vec<String> {
    let array = match (answer.find('['), answer.rfind(']')) {
        (Some(start), Some(end)) if start < end => &answer[start..=end],
        _ => "",
    };
    let mut seen = HashSet::new();
    let mut labels: Vec<String> = serde_json::from_str::<Vec<String>>(array)
        .unwrap_or_default()
        .into_iter()
        .filter(|l| FLOW_LABELS.contains(&l.as_str()))
        .filter(|l| seen.insert(l.clone()))
        .collect();
    if labels.is_empty() {
        labels.push("flow#geral".into());
    }
    labels
}
