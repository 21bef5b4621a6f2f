//! Mapping of a registry snapshot onto supplier enrichment fields.

use super::types::CheckoSnapshot;
use crate::models::SupplierUpdate;

/// Builds the supplier update that stores `snapshot` and its derived fields.
///
/// Revenue and profit come from the latest reported year. The snapshot itself
/// is serialized into `checko_data`.
///
/// # Errors
///
/// Returns an error only if the snapshot cannot be serialized.
pub fn enrichment_from_snapshot(
    snapshot: &CheckoSnapshot,
) -> Result<SupplierUpdate, serde_json::Error> {
    let mut update = SupplierUpdate {
        checko_data: Some(snapshot.to_json()?),
        ..Default::default()
    };

    if let Some(company) = &snapshot.company {
        update.name = company.display_name().map(str::to_string);
        update.ogrn = company.ogrn.clone();
        update.kpp = company.kpp.clone();
        update.okpo = company.okpo.clone();
        update.company_status = company.status_name().map(str::to_string);
        update.registration_date = company.registration_date.clone();
        update.legal_address = company
            .legal_address
            .as_ref()
            .and_then(|a| a.full.clone());
        update.authorized_capital = company.authorized_capital.as_ref().and_then(|c| c.amount);
        if let Some(contacts) = &company.contacts {
            update.phone = contacts.phones.first().cloned();
            update.website = contacts.website.clone();
            update.vk = contacts.vk.clone();
            update.telegram = contacts.telegram.clone();
        }
    }

    if let Some((year, lines)) = snapshot.finances.latest() {
        update.finance_year = Some(year);
        update.revenue = lines.revenue;
        update.profit = lines.net_profit;
    }

    if let Some(cases) = &snapshot.legal_cases {
        update.legal_cases_count = cases.total_count;
        update.legal_cases_sum = cases.total_claim_sum;
        update.legal_cases_as_plaintiff = cases.as_plaintiff.as_ref().and_then(|s| s.count);
        update.legal_cases_as_defendant = cases.as_defendant.as_ref().and_then(|s| s.count);
    }

    Ok(update)
}
