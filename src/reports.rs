// reports.rs
// Agregação financeira e filtros de relatório, computados em memória
// sobre os dados já carregados.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Associado, FlowType, Lancamento, StatusAssociado};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResumoFinanceiro {
    pub receitas: Decimal,
    pub despesas: Decimal,
    pub saldo: Decimal,
    /// Saldo não negativo; controla a apresentação positiva/negativa.
    pub positivo: bool,
}

pub fn resumo<'a, I>(lancamentos: I) -> ResumoFinanceiro
where
    I: IntoIterator<Item = &'a Lancamento>,
{
    let mut receitas = Decimal::ZERO;
    let mut despesas = Decimal::ZERO;
    for lancamento in lancamentos {
        match lancamento.tipo {
            FlowType::Receita => receitas += lancamento.valor,
            FlowType::Despesa => despesas += lancamento.valor,
        }
    }
    let saldo = receitas - despesas;
    ResumoFinanceiro {
        receitas,
        despesas,
        saldo,
        positivo: saldo >= Decimal::ZERO,
    }
}

pub fn dentro_periodo(data: NaiveDate, inicio: NaiveDate, fim: NaiveDate) -> bool {
    data >= inicio && data <= fim
}

pub fn tipo_corresponde(tipo: FlowType, filtro: Option<FlowType>) -> bool {
    filtro.is_none_or(|f| f == tipo)
}

/// Lançamentos com `inicio <= data <= fim` e tipo compatível com o filtro.
/// `inicio > fim` resulta em lista vazia.
pub fn filtra_periodo(
    lancamentos: &[Lancamento],
    inicio: NaiveDate,
    fim: NaiveDate,
    filtro: Option<FlowType>,
) -> Vec<Lancamento> {
    lancamentos
        .iter()
        .filter(|l| dentro_periodo(l.data, inicio, fim) && tipo_corresponde(l.tipo, filtro))
        .cloned()
        .collect()
}

/// Os `n` lançamentos mais recentes, por data decrescente.
pub fn mais_recentes(lancamentos: &[Lancamento], n: usize) -> Vec<Lancamento> {
    let mut ordenados = lancamentos.to_vec();
    ordenados.sort_by(|a, b| b.data.cmp(&a.data));
    ordenados.truncate(n);
    ordenados
}

/// Filtro do relatório de associados: status e faixa (inclusiva) de
/// data de nascimento.
pub fn filtra_associados(
    associados: &[Associado],
    status: Option<StatusAssociado>,
    inicio: Option<NaiveDate>,
    fim: Option<NaiveDate>,
) -> Vec<Associado> {
    associados
        .iter()
        .filter(|a| {
            if let Some(s) = &status {
                if &a.status != s {
                    return false;
                }
            }
            if let Some(i) = inicio {
                if a.data_nascimento < i {
                    return false;
                }
            }
            if let Some(f) = fim {
                if a.data_nascimento > f {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn dia(ano: i32, mes: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(ano, mes, d).unwrap()
    }

    fn lancamento(data: NaiveDate, valor: &str, tipo: FlowType) -> Lancamento {
        Lancamento {
            id: None,
            data,
            descricao: "lançamento".to_string(),
            valor: valor.parse().unwrap(),
            tipo,
            categoria_id: ObjectId::new(),
            observacoes: None,
        }
    }

    #[test]
    fn saldo_e_diferenca_entre_receitas_e_despesas() {
        let lista = vec![
            lancamento(dia(2025, 1, 5), "1200.50", FlowType::Receita),
            lancamento(dia(2025, 1, 9), "300.25", FlowType::Despesa),
            lancamento(dia(2025, 2, 1), "99.75", FlowType::Despesa),
        ];
        let r = resumo(&lista);
        assert_eq!(r.receitas, "1200.50".parse().unwrap());
        assert_eq!(r.despesas, "400.00".parse().unwrap());
        assert_eq!(r.saldo, r.receitas - r.despesas);
        assert!(r.positivo);
    }

    #[test]
    fn saldo_negativo_marca_apresentacao_negativa() {
        let lista = vec![
            lancamento(dia(2025, 1, 5), "100.00", FlowType::Receita),
            lancamento(dia(2025, 1, 6), "100.01", FlowType::Despesa),
        ];
        let r = resumo(&lista);
        assert_eq!(r.saldo, "-0.01".parse().unwrap());
        assert!(!r.positivo);
    }

    #[test]
    fn soma_de_centavos_sem_perda_de_precisao() {
        let lista: Vec<Lancamento> = (0..10)
            .map(|i| lancamento(dia(2025, 1, i + 1), "0.10", FlowType::Receita))
            .collect();
        let r = resumo(&lista);
        assert_eq!(r.receitas, "1.00".parse().unwrap());
    }

    #[test]
    fn periodo_invertido_resulta_vazio() {
        let lista = vec![lancamento(dia(2025, 3, 10), "500.00", FlowType::Receita)];
        let filtrados = filtra_periodo(&lista, dia(2025, 3, 31), dia(2025, 3, 1), None);
        assert!(filtrados.is_empty());
    }

    #[test]
    fn relatorio_de_marco_com_aluguel() {
        // categoria "Aluguel" (receita) com um lançamento em 10/03/2025
        let lista = vec![
            lancamento(dia(2025, 3, 10), "500.00", FlowType::Receita),
            lancamento(dia(2025, 4, 2), "80.00", FlowType::Despesa),
        ];
        let filtrados = filtra_periodo(
            &lista,
            dia(2025, 3, 1),
            dia(2025, 3, 31),
            Some(FlowType::Receita),
        );
        assert_eq!(filtrados.len(), 1);
        assert_eq!(filtrados[0].data, dia(2025, 3, 10));

        let r = resumo(&filtrados);
        assert_eq!(r.receitas, "500.00".parse().unwrap());
        assert_eq!(r.despesas, "0.00".parse().unwrap());
        assert_eq!(r.saldo, "500.00".parse().unwrap());
    }

    #[test]
    fn limites_do_periodo_sao_inclusivos() {
        let lista = vec![
            lancamento(dia(2025, 3, 1), "1.00", FlowType::Receita),
            lancamento(dia(2025, 3, 31), "2.00", FlowType::Receita),
            lancamento(dia(2025, 4, 1), "4.00", FlowType::Receita),
        ];
        let filtrados = filtra_periodo(&lista, dia(2025, 3, 1), dia(2025, 3, 31), None);
        assert_eq!(filtrados.len(), 2);
    }

    #[test]
    fn mais_recentes_ordena_e_trunca() {
        let lista = vec![
            lancamento(dia(2025, 1, 1), "1.00", FlowType::Receita),
            lancamento(dia(2025, 3, 1), "2.00", FlowType::Receita),
            lancamento(dia(2025, 2, 1), "3.00", FlowType::Receita),
        ];
        let recentes = mais_recentes(&lista, 2);
        assert_eq!(recentes.len(), 2);
        assert_eq!(recentes[0].data, dia(2025, 3, 1));
        assert_eq!(recentes[1].data, dia(2025, 2, 1));
    }

    fn associado(nome: &str, status: StatusAssociado, nascimento: NaiveDate) -> Associado {
        Associado {
            id: None,
            nome_completo: nome.to_string(),
            cpf: "000.000.000-00".to_string(),
            rg: "11.111.111-1".to_string(),
            data_nascimento: nascimento,
            endereco_rua: "Rua A".to_string(),
            endereco_numero: "10".to_string(),
            endereco_complemento: None,
            endereco_bairro: "Centro".to_string(),
            endereco_cidade: "São Paulo".to_string(),
            endereco_estado: "SP".to_string(),
            endereco_cep: "00000-000".to_string(),
            contato_telefone: String::new(),
            contato_celular: "(11) 98888-0000".to_string(),
            contato_email: "a@clube.com".to_string(),
            status,
            data_associacao: dia(2020, 1, 1),
            observacoes: None,
        }
    }

    #[test]
    fn filtro_de_associados_por_status_e_nascimento() {
        let lista = vec![
            associado("Ana", StatusAssociado::Ativo, dia(1980, 6, 1)),
            associado("Bruno", StatusAssociado::Inativo, dia(1985, 6, 1)),
            associado("Carla", StatusAssociado::Ativo, dia(1999, 6, 1)),
        ];

        let ativos = filtra_associados(&lista, Some(StatusAssociado::Ativo), None, None);
        assert_eq!(ativos.len(), 2);

        let faixa = filtra_associados(&lista, None, Some(dia(1984, 1, 1)), Some(dia(1990, 1, 1)));
        assert_eq!(faixa.len(), 1);
        assert_eq!(faixa[0].nome_completo, "Bruno");

        let todos = filtra_associados(&lista, None, None, None);
        assert_eq!(todos.len(), 3);
    }
}
