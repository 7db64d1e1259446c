#[path = "common/mod.rs"]
mod common;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use clubegest::models::{Agendamento, FlowType};
use clubegest::state::{
    categoria_em_uso, create_agendamento, create_categoria, create_lancamento, delete_agendamento,
    delete_categoria, delete_lancamento, get_agendamento_by_id, get_categoria_by_id,
    list_agendamentos, list_categorias, list_lancamentos, update_agendamento, update_categoria,
    update_lancamento,
};

fn dia(ano: i32, mes: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(ano, mes, d).unwrap()
}

fn valor(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[tokio::test]
async fn plano_de_contas_is_seeded() {
    let ctx = match common::setup_state().await {
        Some(c) => c,
        None => return,
    };
    let state = ctx.state.clone();

    let categorias = list_categorias(&state).await.unwrap();
    assert!(!categorias.is_empty(), "seeded categories present");
    assert!(categorias.iter().any(|c| c.nome == "Mensalidade"));

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn categorias_crud_works() {
    let ctx = match common::setup_state().await {
        Some(c) => c,
        None => return,
    };
    let state = ctx.state.clone();

    let initial = list_categorias(&state).await.unwrap().len();
    let id = create_categoria(&state, "Bar", FlowType::Receita, None)
        .await
        .unwrap();
    assert_eq!(list_categorias(&state).await.unwrap().len(), initial + 1);

    let matched = update_categoria(
        &state,
        &id,
        "Bar e Restaurante",
        FlowType::Receita,
        Some("vendas do bar".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(matched, 1);
    let fetched = get_categoria_by_id(&state, &id).await.unwrap().unwrap();
    assert_eq!(fetched.nome, "Bar e Restaurante");

    let deleted = delete_categoria(&state, &id).await.unwrap();
    assert_eq!(deleted, 1);
    assert!(get_categoria_by_id(&state, &id).await.unwrap().is_none());

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn lancamentos_crud_and_category_join() {
    let ctx = match common::setup_state().await {
        Some(c) => c,
        None => return,
    };
    let state = ctx.state.clone();

    let categoria = create_categoria(&state, "Eventos", FlowType::Receita, None)
        .await
        .unwrap();

    let antigo = create_lancamento(
        &state,
        dia(2025, 1, 10),
        "Festa junina",
        valor("1500.00"),
        FlowType::Receita,
        &categoria,
        None,
    )
    .await
    .unwrap();
    create_lancamento(
        &state,
        dia(2025, 3, 5),
        "Aluguel do salão",
        valor("500.00"),
        FlowType::Receita,
        &categoria,
        Some("evento particular".to_string()),
    )
    .await
    .unwrap();

    // Ordenado por data decrescente, com a categoria resolvida
    let lancamentos = list_lancamentos(&state).await.unwrap();
    assert_eq!(lancamentos.len(), 2);
    assert_eq!(lancamentos[0].lancamento.descricao, "Aluguel do salão");
    assert_eq!(
        lancamentos[0].categoria.as_ref().map(|c| c.nome.as_str()),
        Some("Eventos")
    );

    let matched = update_lancamento(
        &state,
        &antigo,
        dia(2025, 1, 11),
        "Festa junina (corrigido)",
        valor("1600.00"),
        FlowType::Receita,
        &categoria,
        None,
    )
    .await
    .unwrap();
    assert_eq!(matched, 1);

    // Categoria referenciada não pode sair do plano de contas
    assert!(categoria_em_uso(&state, &categoria).await.unwrap());

    delete_lancamento(&state, &antigo).await.unwrap();
    let restantes = list_lancamentos(&state).await.unwrap();
    assert_eq!(restantes.len(), 1);

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn agendamentos_crud_works() {
    let ctx = match common::setup_state().await {
        Some(c) => c,
        None => return,
    };
    let state = ctx.state.clone();

    let id = create_agendamento(
        &state,
        Agendamento {
            id: None,
            data: dia(2025, 12, 20),
            nome_responsavel: "Maria Oliveira".to_string(),
            contato: "(11) 97777-0000".to_string(),
            observacoes: None,
            valor_cobrado: Some(valor("350.00")),
        },
    )
    .await
    .unwrap();
    create_agendamento(
        &state,
        Agendamento {
            id: None,
            data: dia(2025, 11, 8),
            nome_responsavel: "José Santos".to_string(),
            contato: "(11) 96666-0000".to_string(),
            observacoes: Some("aniversário".to_string()),
            valor_cobrado: None,
        },
    )
    .await
    .unwrap();

    // Listagem por data crescente
    let agendamentos = list_agendamentos(&state).await.unwrap();
    assert_eq!(agendamentos.len(), 2);
    assert_eq!(agendamentos[0].nome_responsavel, "José Santos");

    let mut alterado = get_agendamento_by_id(&state, &id).await.unwrap().unwrap();
    alterado.valor_cobrado = Some(valor("400.00"));
    let matched = update_agendamento(&state, &id, &alterado).await.unwrap();
    assert_eq!(matched, 1);

    let deleted = delete_agendamento(&state, &id).await.unwrap();
    assert_eq!(deleted, 1);
    assert!(get_agendamento_by_id(&state, &id).await.unwrap().is_none());

    common::teardown(Some(ctx)).await;
}
