// models.rs
// Documentos do MongoDB e enums compartilhados do domínio.

use chrono::NaiveDate;
use mongodb::bson::{DateTime, oid::ObjectId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Papéis de usuário para autorização.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Associado,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Associado => "associado",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(UserRole::Admin),
            "associado" => Some(UserRole::Associado),
            _ => None,
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Associado
    }
}

/// Situação cadastral de um associado.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusAssociado {
    Ativo,
    Inativo,
}

impl StatusAssociado {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusAssociado::Ativo => "ativo",
            StatusAssociado::Inativo => "inativo",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ativo" => Some(StatusAssociado::Ativo),
            "inativo" => Some(StatusAssociado::Inativo),
            _ => None,
        }
    }
}

/// Tipo de movimento financeiro, compartilhado por categorias e lançamentos.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Receita,
    Despesa,
}

impl FlowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Receita => "receita",
            FlowType::Despesa => "despesa",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "receita" => Some(FlowType::Receita),
            "despesa" => Some(FlowType::Despesa),
            _ => None,
        }
    }
}

/// Parentesco de um familiar com o associado titular.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Parentesco {
    #[serde(rename = "cônjuge")]
    Conjuge,
    #[serde(rename = "filho(a)")]
    Filho,
    #[serde(rename = "pai/mãe")]
    PaiMae,
    #[serde(rename = "irmão/irmã")]
    IrmaoIrma,
    #[serde(rename = "outro")]
    Outro,
}

impl Parentesco {
    pub fn as_str(&self) -> &'static str {
        match self {
            Parentesco::Conjuge => "cônjuge",
            Parentesco::Filho => "filho(a)",
            Parentesco::PaiMae => "pai/mãe",
            Parentesco::IrmaoIrma => "irmão/irmã",
            Parentesco::Outro => "outro",
        }
    }
}

/// Perfil de usuário do sistema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub nome: String,
    pub email: String,
    pub senha_hash: String,
    pub ativo: bool,
    pub criado_em: Option<DateTime>,
}

/// Registro de role em coleção separada; a ausência de registro é
/// interpretada como `associado` nas listagens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub role: UserRole,
}

/// Sessão autenticada vinculando um token a um usuário com expiração.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub token: String,
    pub user_id: ObjectId,
    pub expires_at: DateTime,
}

/// Associado do clube.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Associado {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub nome_completo: String,
    pub cpf: String,
    pub rg: String,
    pub data_nascimento: NaiveDate,
    pub endereco_rua: String,
    pub endereco_numero: String,
    pub endereco_complemento: Option<String>,
    pub endereco_bairro: String,
    pub endereco_cidade: String,
    pub endereco_estado: String,
    pub endereco_cep: String,
    pub contato_telefone: String,
    pub contato_celular: String,
    pub contato_email: String,
    pub status: StatusAssociado,
    pub data_associacao: NaiveDate,
    pub observacoes: Option<String>,
}

/// Familiar registrado de um associado.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Familiar {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub associado_id: ObjectId,
    pub nome: String,
    pub parentesco: Parentesco,
    pub data_nascimento: NaiveDate,
    pub cpf: Option<String>,
}

/// Categoria do plano de contas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Categoria {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub nome: String,
    pub tipo: FlowType,
    pub descricao: Option<String>,
}

/// Lançamento financeiro. O `tipo` deve coincidir com o tipo da categoria.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lancamento {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub data: NaiveDate,
    pub descricao: String,
    pub valor: Decimal,
    pub tipo: FlowType,
    pub categoria_id: ObjectId,
    pub observacoes: Option<String>,
}

/// Agendamento de aluguel do salão para uma data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agendamento {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub data: NaiveDate,
    pub nome_responsavel: String,
    pub contato: String,
    pub observacoes: Option<String>,
    pub valor_cobrado: Option<Decimal>,
}
