use super::xml_utils::{XmlResult, XmlWriter, format_decimal};
use super::ubl_ns;
use crate::core::*;

/// Render a normalized invoice as Peppol BIS 3.0 UBL.
///
/// Elements follow the UBL 2.1 sequence. Optional blocks are written only
/// when they carry a non-blank value.
pub fn render(invoice: &NormalizedInvoice, config: &TransformConfig) -> XmlResult {
    let kind = invoice.kind;
    let currency = invoice.currency_code.as_str();
    let mut w = XmlWriter::new()?;

    let root = kind.root_element();
    w.start_element_with_attrs(
        root,
        &[
            ("xmlns", kind.namespace()),
            ("xmlns:cac", ubl_ns::CAC),
            ("xmlns:cbc", ubl_ns::CBC),
        ],
    )?;

    // BT-24, BT-23
    w.text_element("cbc:CustomizationID", &config.customization_id)?;
    w.text_element("cbc:ProfileID", &config.profile_id)?;
    // BT-1, BT-2
    w.text_element("cbc:ID", &invoice.number)?;
    w.date_element("cbc:IssueDate", invoice.issue_date)?;
    // BT-9: header due date exists only on Invoice
    if !kind.is_credit_note() {
        if let Some(due) = invoice.due_date {
            w.date_element("cbc:DueDate", due)?;
        }
    }
    // BT-3
    w.text_element(kind.type_code_element(), &kind.type_code().to_string())?;
    // BT-5
    w.text_element("cbc:DocumentCurrencyCode", currency)?;
    // BT-10, BT-13, BT-16
    w.optional_text_element("cbc:BuyerReference", invoice.buyer_reference.as_deref())?;
    w.id_reference("cac:OrderReference", invoice.order_reference.as_deref())?;
    w.id_reference(
        "cac:DespatchDocumentReference",
        invoice.despatch_reference.as_deref(),
    )?;

    // BG-4, BG-7
    write_party(&mut w, &invoice.supplier, "cac:AccountingSupplierParty", config)?;
    write_party(&mut w, &invoice.buyer, "cac:AccountingCustomerParty", config)?;

    write_payment_means(&mut w, invoice, config)?;

    // BT-20
    if let Some(terms) = invoice.payment_terms.as_deref().filter(|t| !t.trim().is_empty()) {
        w.start_element("cac:PaymentTerms")?;
        w.text_element("cbc:Note", terms)?;
        w.end_element("cac:PaymentTerms")?;
    }

    // BG-23
    w.start_element("cac:TaxTotal")?;
    w.amount_element("cbc:TaxAmount", invoice.totals.tax, currency)?;
    for subtotal in &invoice.tax_subtotals {
        w.start_element("cac:TaxSubtotal")?;
        w.amount_element("cbc:TaxableAmount", subtotal.taxable_amount, currency)?;
        w.amount_element("cbc:TaxAmount", subtotal.tax_amount, currency)?;
        w.start_element("cac:TaxCategory")?;
        w.text_element("cbc:ID", subtotal.category.code())?;
        w.text_element("cbc:Percent", &format_decimal(subtotal.rate))?;
        w.optional_text_element("cbc:TaxExemptionReason", subtotal.exemption_reason.as_deref())?;
        write_vat_scheme(&mut w)?;
        w.end_element("cac:TaxCategory")?;
        w.end_element("cac:TaxSubtotal")?;
    }
    w.end_element("cac:TaxTotal")?;

    // BG-22
    let totals = &invoice.totals;
    w.start_element("cac:LegalMonetaryTotal")?;
    w.amount_element("cbc:LineExtensionAmount", totals.line_extension, currency)?;
    w.amount_element("cbc:TaxExclusiveAmount", totals.tax_exclusive, currency)?;
    w.amount_element("cbc:TaxInclusiveAmount", totals.tax_inclusive, currency)?;
    w.amount_element("cbc:PayableAmount", totals.payable, currency)?;
    w.end_element("cac:LegalMonetaryTotal")?;

    // BG-25
    for line in &invoice.lines {
        write_line(&mut w, line, kind, invoice.dialect.price_scale())?;
    }

    w.end_element(root)?;
    w.into_string()
}

fn write_party(
    w: &mut XmlWriter,
    party: &Party,
    wrapper: &str,
    config: &TransformConfig,
) -> Result<(), MappingError> {
    w.start_element(wrapper)?;
    w.start_element("cac:Party")?;

    // BT-34/49
    if let Some(ep) = &party.endpoint {
        let scheme = ep.scheme_or(&config.default_endpoint_scheme);
        w.text_element_with_attrs("cbc:EndpointID", &ep.value, &[("schemeID", scheme)])?;
    }

    w.start_element("cac:PartyName")?;
    w.text_element("cbc:Name", &party.name)?;
    w.end_element("cac:PartyName")?;

    // BG-5/8
    let address = &party.address;
    w.start_element("cac:PostalAddress")?;
    w.optional_text_element("cbc:StreetName", address.street.as_deref())?;
    w.optional_text_element("cbc:CityName", address.city.as_deref())?;
    w.optional_text_element("cbc:PostalZone", address.postal_code.as_deref())?;
    if let Some(country) = address.country_code.as_deref().filter(|c| !c.trim().is_empty()) {
        w.start_element("cac:Country")?;
        w.text_element("cbc:IdentificationCode", country)?;
        w.end_element("cac:Country")?;
    }
    w.end_element("cac:PostalAddress")?;

    // BT-31/48
    if let Some(vat) = party.vat_number.as_deref().filter(|v| !v.trim().is_empty()) {
        w.start_element("cac:PartyTaxScheme")?;
        w.text_element("cbc:CompanyID", vat)?;
        write_vat_scheme(w)?;
        w.end_element("cac:PartyTaxScheme")?;
    }

    // BT-27/44, BT-30/47
    w.start_element("cac:PartyLegalEntity")?;
    w.text_element("cbc:RegistrationName", &party.name)?;
    w.optional_text_element("cbc:CompanyID", party.legal_id.as_deref())?;
    w.end_element("cac:PartyLegalEntity")?;

    w.end_element("cac:Party")?;
    w.end_element(wrapper)?;
    Ok(())
}

/// BG-16. Written when there is a payee account, and for credit notes with a
/// due date, which UBL 2.1 only carries as `PaymentMeans/PaymentDueDate`.
fn write_payment_means(
    w: &mut XmlWriter,
    invoice: &NormalizedInvoice,
    config: &TransformConfig,
) -> Result<(), MappingError> {
    let due_date = invoice.due_date.filter(|_| invoice.kind.is_credit_note());
    if invoice.bank_account.is_none() && due_date.is_none() {
        return Ok(());
    }

    w.start_element("cac:PaymentMeans")?;
    w.text_element("cbc:PaymentMeansCode", &config.payment_means_code)?;
    if let Some(due) = due_date {
        w.date_element("cbc:PaymentDueDate", due)?;
    }
    // BT-83
    w.text_element("cbc:PaymentID", &invoice.number)?;
    // BG-17
    if let Some(account) = &invoice.bank_account {
        w.start_element("cac:PayeeFinancialAccount")?;
        w.text_element("cbc:ID", &account.iban)?;
        w.optional_text_element("cbc:Name", account.account_name.as_deref())?;
        if let Some(bic) = account.bic.as_deref().filter(|b| !b.trim().is_empty()) {
            w.start_element("cac:FinancialInstitutionBranch")?;
            w.text_element("cbc:ID", bic)?;
            w.end_element("cac:FinancialInstitutionBranch")?;
        }
        w.end_element("cac:PayeeFinancialAccount")?;
    }
    w.end_element("cac:PaymentMeans")?;
    Ok(())
}

fn write_line(
    w: &mut XmlWriter,
    line: &NormalizedLine,
    kind: DocumentKind,
    price_scale: u32,
) -> Result<(), MappingError> {
    let currency = line.currency.as_str();
    let element = kind.line_element();

    w.start_element(element)?;
    // BT-126
    w.text_element("cbc:ID", &line.id)?;
    // BT-129/130
    w.quantity_element(kind.quantity_element(), line.quantity, &line.unit_code)?;
    // BT-131
    w.amount_element("cbc:LineExtensionAmount", line.line_amount, currency)?;

    // BG-27/28
    for adj in &line.adjustments {
        write_allowance_charge(w, adj, currency)?;
    }

    w.start_element("cac:Item")?;
    w.optional_text_element("cbc:Description", line.description.as_deref())?;
    w.text_element("cbc:Name", &line.name)?;
    if let Some(sid) = line.seller_item_id.as_deref().filter(|s| !s.trim().is_empty()) {
        w.start_element("cac:SellersItemIdentification")?;
        w.text_element("cbc:ID", sid)?;
        w.end_element("cac:SellersItemIdentification")?;
    }
    w.start_element("cac:ClassifiedTaxCategory")?;
    w.text_element("cbc:ID", line.tax_category.code())?;
    w.text_element("cbc:Percent", &format_decimal(line.tax_rate))?;
    write_vat_scheme(w)?;
    w.end_element("cac:ClassifiedTaxCategory")?;
    w.end_element("cac:Item")?;

    // BT-146
    w.start_element("cac:Price")?;
    w.price_element("cbc:PriceAmount", line.price, price_scale, currency)?;
    w.end_element("cac:Price")?;

    w.end_element(element)?;
    Ok(())
}

fn write_allowance_charge(
    w: &mut XmlWriter,
    adj: &Adjustment,
    currency: &str,
) -> Result<(), MappingError> {
    w.start_element("cac:AllowanceCharge")?;
    w.text_element(
        "cbc:ChargeIndicator",
        if adj.is_charge { "true" } else { "false" },
    )?;
    w.optional_text_element("cbc:AllowanceChargeReason", adj.reason.as_deref())?;
    if let (Some(pct), Some(_)) = (adj.percentage, adj.base_amount) {
        w.text_element("cbc:MultiplierFactorNumeric", &format_decimal(pct))?;
    }
    w.amount_element("cbc:Amount", adj.amount, currency)?;
    if let Some(base) = adj.base_amount {
        w.amount_element("cbc:BaseAmount", base, currency)?;
    }
    w.end_element("cac:AllowanceCharge")?;
    Ok(())
}

fn write_vat_scheme(w: &mut XmlWriter) -> Result<(), MappingError> {
    w.start_element("cac:TaxScheme")?;
    w.text_element("cbc:ID", "VAT")?;
    w.end_element("cac:TaxScheme")?;
    Ok(())
}
