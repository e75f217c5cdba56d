use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::record::Record;
use crate::utils::format::{format_brl, format_date, format_decimal};

/// One billable sub-registration of a school in a period
///
/// Every field holds the text shown in the form; nothing is validated until commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CadastroEntry {
    /// Número do cadastro / matrícula
    pub registration_code: String,
    /// Hidrômetro, medidor ou linha
    pub meter_id: String,
    pub consumption: String,
    /// Dias do ciclo de faturamento
    pub billing_days: String,
    pub previous_reading: String,
    pub current_reading: String,
    pub due_date: String,
    pub amount: String,
    /// Retenção de imposto (opcional)
    pub withholding_tax: String,
    pub installation_type: String,
    /// "Utilizado por"
    pub used_by: String,
}

impl CadastroEntry {
    /// Entry pre-filled from the previous period
    ///
    /// Only the identifying fields are carried: registration code, meter id and
    /// installation type. Readings, dates and money start blank.
    pub fn carried_from(record: &Record) -> Self {
        Self {
            registration_code: record.registration_code.clone(),
            meter_id: record.meter_id.clone(),
            installation_type: record.installation_type.clone(),
            ..Self::default()
        }
    }

    /// Entry fully populated from a stored record
    pub fn from_record(record: &Record) -> Self {
        Self {
            registration_code: record.registration_code.clone(),
            meter_id: record.meter_id.clone(),
            consumption: format_decimal(record.consumption),
            billing_days: record
                .billing_days
                .map(|d| d.to_string())
                .unwrap_or_default(),
            previous_reading: format_date(record.previous_reading),
            current_reading: format_date(record.current_reading),
            due_date: format_date(record.due_date),
            amount: format_brl(record.amount),
            withholding_tax: record.withholding_tax.map(format_brl).unwrap_or_default(),
            installation_type: record.installation_type.clone(),
            used_by: record.used_by.clone(),
        }
    }

    /// Mutable access to one field
    pub fn field_mut(&mut self, field: CadastroField) -> &mut String {
        match field {
            CadastroField::RegistrationCode => &mut self.registration_code,
            CadastroField::MeterId => &mut self.meter_id,
            CadastroField::Consumption => &mut self.consumption,
            CadastroField::BillingDays => &mut self.billing_days,
            CadastroField::PreviousReading => &mut self.previous_reading,
            CadastroField::CurrentReading => &mut self.current_reading,
            CadastroField::DueDate => &mut self.due_date,
            CadastroField::Amount => &mut self.amount,
            CadastroField::WithholdingTax => &mut self.withholding_tax,
            CadastroField::InstallationType => &mut self.installation_type,
            CadastroField::UsedBy => &mut self.used_by,
        }
    }

    pub fn field(&self, field: CadastroField) -> &str {
        match field {
            CadastroField::RegistrationCode => &self.registration_code,
            CadastroField::MeterId => &self.meter_id,
            CadastroField::Consumption => &self.consumption,
            CadastroField::BillingDays => &self.billing_days,
            CadastroField::PreviousReading => &self.previous_reading,
            CadastroField::CurrentReading => &self.current_reading,
            CadastroField::DueDate => &self.due_date,
            CadastroField::Amount => &self.amount,
            CadastroField::WithholdingTax => &self.withholding_tax,
            CadastroField::InstallationType => &self.installation_type,
            CadastroField::UsedBy => &self.used_by,
        }
    }
}

/// Editable field of a [`CadastroEntry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CadastroField {
    RegistrationCode,
    MeterId,
    Consumption,
    BillingDays,
    PreviousReading,
    CurrentReading,
    DueDate,
    Amount,
    WithholdingTax,
    InstallationType,
    UsedBy,
}

impl CadastroField {
    pub const ALL: [CadastroField; 11] = [
        CadastroField::RegistrationCode,
        CadastroField::MeterId,
        CadastroField::Consumption,
        CadastroField::BillingDays,
        CadastroField::PreviousReading,
        CadastroField::CurrentReading,
        CadastroField::DueDate,
        CadastroField::Amount,
        CadastroField::WithholdingTax,
        CadastroField::InstallationType,
        CadastroField::UsedBy,
    ];

    /// Form label
    pub fn label(self) -> &'static str {
        match self {
            CadastroField::RegistrationCode => "cadastro",
            CadastroField::MeterId => "medidor",
            CadastroField::Consumption => "consumo",
            CadastroField::BillingDays => "dias",
            CadastroField::PreviousReading => "leitura_anterior",
            CadastroField::CurrentReading => "leitura_atual",
            CadastroField::DueDate => "vencimento",
            CadastroField::Amount => "valor",
            CadastroField::WithholdingTax => "retencao",
            CadastroField::InstallationType => "tipo_instalacao",
            CadastroField::UsedBy => "utilizado_por",
        }
    }

    /// Parse a label or alias typed by the user
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cadastro" | "matricula" | "matrícula" | "codigo" => {
                Some(CadastroField::RegistrationCode)
            }
            "medidor" | "hidrometro" | "hidrômetro" | "linha" => Some(CadastroField::MeterId),
            "consumo" => Some(CadastroField::Consumption),
            "dias" => Some(CadastroField::BillingDays),
            "leitura_anterior" | "anterior" => Some(CadastroField::PreviousReading),
            "leitura_atual" | "atual" => Some(CadastroField::CurrentReading),
            "vencimento" => Some(CadastroField::DueDate),
            "valor" => Some(CadastroField::Amount),
            "retencao" | "retenção" | "imposto" => Some(CadastroField::WithholdingTax),
            "tipo_instalacao" | "tipo" | "instalacao" => Some(CadastroField::InstallationType),
            "utilizado_por" | "uso" => Some(CadastroField::UsedBy),
            _ => None,
        }
    }
}

impl fmt::Display for CadastroField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
