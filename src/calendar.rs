// calendar.rs
// Grade mensal da agenda: células em branco até o primeiro dia do mês
// (semana começando no domingo) seguidas de uma célula por dia.

use chrono::{Datelike, NaiveDate};

use crate::models::Agendamento;

pub fn dias_no_mes(ano: i32, mes: u32) -> u32 {
    let (ano_seguinte, mes_seguinte) = if mes == 12 { (ano + 1, 1) } else { (ano, mes + 1) };
    NaiveDate::from_ymd_opt(ano_seguinte, mes_seguinte, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(0)
}

/// Gera as células do calendário do mês; `None` marca as posições vazias
/// antes do dia 1. Mês inválido produz uma grade vazia.
pub fn month_grid(ano: i32, mes: u32) -> Vec<Option<NaiveDate>> {
    let Some(primeiro) = NaiveDate::from_ymd_opt(ano, mes, 1) else {
        return Vec::new();
    };

    let em_branco = primeiro.weekday().num_days_from_sunday() as usize;
    let mut dias: Vec<Option<NaiveDate>> = Vec::with_capacity(em_branco + 31);
    for _ in 0..em_branco {
        dias.push(None);
    }
    for dia in 1..=dias_no_mes(ano, mes) {
        dias.push(NaiveDate::from_ymd_opt(ano, mes, dia));
    }
    dias
}

/// Agendamento de um dia. Datas duplicadas não são impedidas pelo banco;
/// a consulta devolve o primeiro registro na ordem armazenada.
pub fn agendamento_do_dia(agendamentos: &[Agendamento], dia: NaiveDate) -> Option<&Agendamento> {
    agendamentos.iter().find(|a| a.data == dia)
}

pub fn dia_ocupado(agendamentos: &[Agendamento], dia: NaiveDate) -> bool {
    agendamento_do_dia(agendamentos, dia).is_some()
}
