use crate::format::format_currency;
use crate::models::{DetailRow, ReportDetails};
use crate::series::coerce_signed;
use serde_json::Value;

const PAYER_CATEGORIES: [(&str, &str); 4] = [
    ("big", "الكبار"),
    ("med", "الشبان"),
    ("small", "الصغار"),
    ("women", "النساء"),
];

/// Flattens the `income`/`expenses` breakdown objects of a financial report
/// into table rows. Sections the backend leaves out are skipped.
pub fn report_details(income: &Value, expenses: &Value) -> ReportDetails {
    ReportDetails {
        income: income_rows(income),
        expenses: expense_rows(expenses),
    }
}

pub fn income_rows(income: &Value) -> Vec<DetailRow> {
    let mut rows = Vec::new();

    if let Some(payments) = section(income, "payments") {
        let by_category = section(payments, "by_category");
        let payers: f64 = by_category
            .and_then(Value::as_object)
            .map(|counts| counts.values().map(coerce_signed).sum())
            .unwrap_or(0.0);
        let note = by_category.map(|counts| {
            PAYER_CATEGORIES
                .iter()
                .map(|(key, label)| format!("{label}: {}", count_text(coerce_signed(&counts[*key]))))
                .collect::<Vec<_>>()
                .join(" • ")
        });
        rows.push(row("اشتراكات الأعضاء", note, count_text(payers), &payments["total"]));
    }

    if let Some(articles) = section(income, "articles") {
        let count = count_text(coerce_signed(&articles["count"]));
        rows.push(row("الأنشطة والدورات", None, count, &articles["total"]));
    }

    rows.extend(item_rows(income, "added_payments"));
    rows
}

pub fn expense_rows(expenses: &Value) -> Vec<DetailRow> {
    let mut rows = Vec::new();

    if let Some(rent) = section(expenses, "rent") {
        rows.push(row("الإيجار", None, months_text(&rent["months"]), &rent["total"]));
    }

    let members = section(expenses, "staff")
        .and_then(|staff| staff["members"].as_array())
        .into_iter()
        .flatten();
    for member in members {
        rows.push(row(
            member["name"].as_str().unwrap_or_default(),
            Some("راتب".to_string()),
            months_text(&member["months"]),
            &member["total"],
        ));
    }

    if let Some(articles) = section(expenses, "articles") {
        let count = count_text(coerce_signed(&articles["count"]));
        rows.push(row("تكاليف الأنشطة", None, count, &articles["total"]));
    }

    rows.extend(item_rows(expenses, "costs"));
    rows
}

fn item_rows(parent: &Value, key: &str) -> Vec<DetailRow> {
    section(parent, key)
        .and_then(|items| items["items"].as_array())
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let note = item["description"]
                        .as_str()
                        .filter(|text| !text.trim().is_empty())
                        .map(str::to_string);
                    row(
                        item["title"].as_str().unwrap_or_default(),
                        note,
                        "-".to_string(),
                        &item["amount"],
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}

fn section<'a>(parent: &'a Value, key: &str) -> Option<&'a Value> {
    parent.get(key).filter(|value| value.is_object())
}

fn row(label: &str, note: Option<String>, quantity: String, amount: &Value) -> DetailRow {
    let amount = coerce_signed(amount);
    DetailRow {
        label: label.to_string(),
        note,
        quantity,
        amount,
        amount_text: format_currency(amount),
    }
}

fn months_text(value: &Value) -> String {
    format!("{} شهر", count_text(coerce_signed(value)))
}

fn count_text(count: f64) -> String {
    if count.fract() == 0.0 {
        format!("{count:.0}")
    } else {
        count.to_string()
    }
}
