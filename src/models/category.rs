use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AppError, AppResult};

/// The category every counterparty falls back to when no keyword matches.
pub const FALLBACK_CATEGORY: &str = "Outros";

/// An ordered keyword table mapping counterparty-name substrings to
/// spending categories.
///
/// Matching order is part of the contract: the first category whose
/// keyword list contains a matching substring wins, so earlier entries
/// shadow later ones. Keywords are matched against the upper-cased
/// counterparty name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTable {
    entries: Vec<CategoryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub category: String,
    pub keywords: Vec<String>,
}

impl CategoryTable {
    /// The built-in table, tuned for Brazilian bank statement exports.
    pub fn builtin() -> Self {
        let entries = [
            (
                "Educação",
                &["COLEGIO", "ESCOLA", "FACULDADE", "HEBE MARSIGLIA"][..],
            ),
            (
                "Alimentação",
                &[
                    "ZAFFARI",
                    "ATACADÃO",
                    "SUPERMERCADO",
                    "BK BRASIL",
                    "IFOOD",
                    "COMERCIAL",
                ][..],
            ),
            (
                "Serviços Públicos",
                &["CIA RIOGRANDENSE", "CIA ESTADUAL", "SANEMEN", "ENERGIA", "AGUA"][..],
            ),
            (
                "Transporte",
                &["UBER", "TRANSPESSOAL", "BUS2", "ESTACIONAMENTO", "REK PARKING"][..],
            ),
            (
                "Saúde",
                &["FARMÁCIA", "MEDICAMENTOS", "BRAIR", "PLANO DE SAÚDE"][..],
            ),
            (
                "Compras Online",
                &["SHOPEE", "AMERICANAS", "NETSHOES", "MERCADO LIVRE"][..],
            ),
            (
                "Serviços Financeiros",
                &["SERASA", "OPP SERVICOS", "FINANCEIRO", "BANCO", "ITAU"][..],
            ),
            (
                "Família",
                &[
                    "MAURICIO BENITES",
                    "DEBORA APARECIDA",
                    "SELMA FURTADO",
                    "GISELE BORGES",
                    "JOÃO VITOR",
                ][..],
            ),
            (
                "Lazer",
                &["CROSS EXPERIENCE", "ACADEMIA", "CINEMA", "RESTAURANTE"][..],
            ),
            (
                "Impostos/Taxas",
                &["IPVA", "SEFAZ", "DETRAN", "GAD/E", "IMPOSTO"][..],
            ),
            (
                "Telecomunicações",
                &["CLARO", "TELEFONE", "INTERNET"][..],
            ),
        ];

        Self {
            entries: entries
                .iter()
                .map(|(category, keywords)| CategoryEntry {
                    category: category.to_string(),
                    keywords: keywords.iter().map(|k| k.to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Load a user-provided table from a JSON file.
    ///
    /// The file holds an array of `{ "category": .., "keywords": [..] }`
    /// objects; order in the file is the matching order.
    pub fn from_json_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<CategoryEntry> = serde_json::from_str(&content)
            .map_err(|e| AppError::Internal(format!("Invalid category table: {}", e)))?;
        Ok(Self { entries })
    }

    /// Assign a spending category to a counterparty name. A blank name
    /// never matches and falls through to [`FALLBACK_CATEGORY`].
    pub fn categorize(&self, counterparty: &str) -> &str {
        let haystack = counterparty.trim().to_uppercase();
        for entry in &self.entries {
            if entry.keywords.iter().any(|k| haystack.contains(k.as_str())) {
                return &entry.category;
            }
        }
        FALLBACK_CATEGORY
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.category.as_str())
    }
}
