#[path = "common/mod.rs"]
mod common;

use chrono::NaiveDate;

use clubegest::models::{Associado, Parentesco, StatusAssociado};
use clubegest::state::{
    create_associado, create_familiar, delete_associado, delete_familiar, get_associado_by_id,
    list_associados, list_familiares, update_associado,
};

fn dia(ano: i32, mes: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(ano, mes, d).unwrap()
}

fn associado(nome: &str, cpf: &str) -> Associado {
    Associado {
        id: None,
        nome_completo: nome.to_string(),
        cpf: cpf.to_string(),
        rg: "12.345.678-9".to_string(),
        data_nascimento: dia(1980, 5, 20),
        endereco_rua: "Rua das Flores".to_string(),
        endereco_numero: "123".to_string(),
        endereco_complemento: None,
        endereco_bairro: "Centro".to_string(),
        endereco_cidade: "São Paulo".to_string(),
        endereco_estado: "SP".to_string(),
        endereco_cep: "01000-000".to_string(),
        contato_telefone: String::new(),
        contato_celular: "(11) 98888-0000".to_string(),
        contato_email: "contato@clube.local".to_string(),
        status: StatusAssociado::Ativo,
        data_associacao: dia(2020, 1, 15),
        observacoes: None,
    }
}

#[tokio::test]
async fn associados_crud_works() {
    let ctx = match common::setup_state().await {
        Some(c) => c,
        None => return,
    };
    let state = ctx.state.clone();

    let id = create_associado(&state, associado("João da Silva", "111.111.111-11"))
        .await
        .unwrap();

    let fetched = get_associado_by_id(&state, &id).await.unwrap().unwrap();
    assert_eq!(fetched.nome_completo, "João da Silva");
    assert_eq!(fetched.status, StatusAssociado::Ativo);

    let mut alterado = fetched.clone();
    alterado.status = StatusAssociado::Inativo;
    alterado.observacoes = Some("mensalidade em atraso".to_string());
    let matched = update_associado(&state, &id, &alterado).await.unwrap();
    assert_eq!(matched, 1);

    let fetched = get_associado_by_id(&state, &id).await.unwrap().unwrap();
    assert_eq!(fetched.status, StatusAssociado::Inativo);
    assert_eq!(fetched.observacoes.as_deref(), Some("mensalidade em atraso"));

    let deleted = delete_associado(&state, &id).await.unwrap();
    assert_eq!(deleted, 1);
    assert!(get_associado_by_id(&state, &id).await.unwrap().is_none());

    // Repetir a exclusão não encontra nada e não tem efeito colateral
    assert_eq!(delete_associado(&state, &id).await.unwrap(), 0);

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn associados_are_listed_by_name() {
    let ctx = match common::setup_state().await {
        Some(c) => c,
        None => return,
    };
    let state = ctx.state.clone();

    create_associado(&state, associado("Carla Souza", "333.333.333-33"))
        .await
        .unwrap();
    create_associado(&state, associado("Ana Lima", "222.222.222-22"))
        .await
        .unwrap();

    let nomes: Vec<String> = list_associados(&state)
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.nome_completo)
        .collect();
    assert_eq!(nomes, vec!["Ana Lima".to_string(), "Carla Souza".to_string()]);

    common::teardown(Some(ctx)).await;
}

#[tokio::test]
async fn familiares_crud_and_cascade_on_member_delete() {
    let ctx = match common::setup_state().await {
        Some(c) => c,
        None => return,
    };
    let state = ctx.state.clone();

    let titular = create_associado(&state, associado("Titular", "444.444.444-44"))
        .await
        .unwrap();

    let filho = create_familiar(
        &state,
        &titular,
        "Pedro",
        Parentesco::Filho,
        dia(2010, 3, 2),
        None,
    )
    .await
    .unwrap();
    create_familiar(
        &state,
        &titular,
        "Helena",
        Parentesco::Conjuge,
        dia(1982, 7, 14),
        Some("555.555.555-55".to_string()),
    )
    .await
    .unwrap();

    let familiares = list_familiares(&state, &titular).await.unwrap();
    assert_eq!(familiares.len(), 2);
    assert_eq!(familiares[0].nome, "Helena");
    assert_eq!(familiares[1].parentesco, Parentesco::Filho);

    let deleted = delete_familiar(&state, &filho).await.unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(list_familiares(&state, &titular).await.unwrap().len(), 1);

    // Remover o titular leva os familiares junto
    delete_associado(&state, &titular).await.unwrap();
    assert!(list_familiares(&state, &titular).await.unwrap().is_empty());

    common::teardown(Some(ctx)).await;
}
