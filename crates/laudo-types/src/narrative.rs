//! Standard report texts shared by the narrative generator and the assembler

use chrono::{Datelike, NaiveDate};

use crate::record::InspectionRecord;

const MONTHS_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Standard technical conclusion with day-range, address and contractor filled in
///
/// This is the text used in template mode and whenever an AI-backed
/// narrative cannot be produced.
pub fn standard_narrative(record: &InspectionRecord) -> String {
    format!(
        "O presente laudo técnico de inspeção predial foi elaborado com base nas vistorias \
         realizadas nos dias {days}, no imóvel situado em {address}, de responsabilidade de \
         {contractor}. As constatações registradas na anamnese foram classificadas quanto à \
         origem, ao grau de risco e ao patamar de urgência, conforme os critérios da ABNT NBR \
         16747:2020.\n\n\
         Recomenda-se que as anomalias e falhas classificadas como Prioridade 1 sejam tratadas \
         imediatamente, seguidas pelas de Prioridade 2 e Prioridade 3, observando-se as \
         recomendações técnicas de cada evento. As intervenções devem ser executadas por \
         profissionais habilitados, com registro de responsabilidade técnica, e incorporadas ao \
         plano de manutenção da edificação.\n\n\
         A regularização das documentações ausentes e a implantação de rotinas de manutenção \
         preventiva são condições para a preservação do desempenho, da segurança e da vida útil \
         do empreendimento.",
        days = record.inspection_days.trim(),
        address = record.address.trim(),
        contractor = record.contractor.trim(),
    )
}

/// dd/mm/yyyy
pub fn short_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// "11 de julho de 2025"
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} de {} de {}",
        date.day(),
        MONTHS_PT[date.month0() as usize],
        date.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> InspectionRecord {
        let mut record = InspectionRecord::new(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap());
        record.contractor = "Condomínio Mar Azul".into();
        record.address = "Rua das Flores, 10".into();
        record.inspection_days = "03 a 04/03/2025".into();
        record
    }

    #[test]
    fn test_standard_narrative_interpolates_record() {
        let text = standard_narrative(&record());
        assert!(text.contains("nos dias 03 a 04/03/2025"));
        assert!(text.contains("situado em Rua das Flores, 10"));
        assert!(text.contains("de responsabilidade de Condomínio Mar Azul"));
    }

    #[test]
    fn test_standard_narrative_is_deterministic() {
        assert_eq!(standard_narrative(&record()), standard_narrative(&record()));
    }

    #[test]
    fn test_dates() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(short_date(date), "05/03/2025");
        assert_eq!(long_date(date), "5 de março de 2025");
    }
}
