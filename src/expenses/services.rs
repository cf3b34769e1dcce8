use time::{macros::format_description, Date};

use super::{
    dto::{AmountInput, ExpensePayload, ExpenseView},
    repo_types::{Expense, ExpenseDraft},
};
use crate::{
    categories::CategoryRegistry,
    config::AmountPolicy,
    error::{AppError, AppResult},
};

const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// Checks presence of all four fields and applies the configured amount policy.
pub fn validate_payload(payload: ExpensePayload, policy: AmountPolicy) -> AppResult<ExpenseDraft> {
    let description = required(payload.description)?;
    let category = required(payload.category)?;
    let date = required(payload.date)?;
    let amount = match payload.amount {
        None => return Err(AppError::Validation(ALL_FIELDS_REQUIRED.into())),
        Some(AmountInput::Text(s)) if s.is_empty() => {
            return Err(AppError::Validation(ALL_FIELDS_REQUIRED.into()))
        }
        Some(input) => coerce_amount(input, policy)?,
    };

    if policy == AmountPolicy::Strict && !is_calendar_date(&date) {
        return Err(AppError::Validation("date must be a valid YYYY-MM-DD date".into()));
    }

    Ok(ExpenseDraft {
        description,
        amount,
        category,
        date,
    })
}

fn required(field: Option<String>) -> AppResult<String> {
    match field {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(AppError::Validation(ALL_FIELDS_REQUIRED.into())),
    }
}

/// Permissive mode never fails: text keeps its leading numeric part
/// (`"12.50 USD"` is 12.5), and anything else unparseable or non-finite becomes 0.0.
/// Strict mode wants the whole trimmed string to be a number.
pub fn coerce_amount(input: AmountInput, policy: AmountPolicy) -> AppResult<f64> {
    let parsed = match input {
        AmountInput::Number(n) => Some(n),
        AmountInput::Text(s) => match policy {
            AmountPolicy::Permissive => leading_float(s.trim()),
            AmountPolicy::Strict => s.trim().parse::<f64>().ok(),
        },
        AmountInput::Other(_) => None,
    }
    .filter(|n| n.is_finite());

    match (parsed, policy) {
        (Some(n), _) => Ok(n),
        (None, AmountPolicy::Permissive) => Ok(0.0),
        (None, AmountPolicy::Strict) => Err(AppError::Validation("amount must be a number".into())),
    }
}

/// Longest `[+-]digits[.digits][e[+-]digits]` prefix of `s`, parsed.
fn leading_float(s: &str) -> Option<f64> {
    let b = s.as_bytes();
    let digits_from = |mut i: usize| {
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let sign = usize::from(matches!(b.first(), Some(b'+' | b'-')));
    let mut end = digits_from(sign);
    let mut mantissa = end - sign;
    if b.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa += frac_end - (end + 1);
        if mantissa > 0 {
            end = frac_end;
        }
    }
    if mantissa == 0 {
        return None;
    }

    if matches!(b.get(end), Some(b'e' | b'E')) {
        let exp_start = end + 1 + usize::from(matches!(b.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }
    s[..end].parse().ok()
}

fn is_calendar_date(s: &str) -> bool {
    s.len() == 10 && Date::parse(s, format_description!("[year]-[month]-[day]")).is_ok()
}

pub fn enrich(expense: Expense, categories: &CategoryRegistry) -> ExpenseView {
    let category_color = categories.color_for(&expense.category).to_string();
    ExpenseView {
        category_name: expense.category.clone(),
        category_color,
        expense,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::DEFAULT_CATEGORY_COLOR;
    use crate::storage::default_categories;
    use serde_json::json;

    fn payload(v: serde_json::Value) -> ExpensePayload {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn accepts_complete_payload() {
        let draft = validate_payload(
            payload(json!({"description": "Coffee", "amount": 4.5, "category": "Food & Dining", "date": "2024-03-01"})),
            AmountPolicy::Permissive,
        )
        .unwrap();
        assert_eq!(draft.amount, 4.5);
        assert_eq!(draft.category, "Food & Dining");
    }

    #[test]
    fn rejects_missing_or_empty_fields() {
        for body in [
            json!({"amount": 1, "category": "Other", "date": "2024-01-01"}),
            json!({"description": "", "amount": 1, "category": "Other", "date": "2024-01-01"}),
            json!({"description": "x", "category": "Other", "date": "2024-01-01"}),
            json!({"description": "x", "amount": "", "category": "Other", "date": "2024-01-01"}),
            json!({"description": "x", "amount": 1, "date": "2024-01-01"}),
            json!({"description": "x", "amount": 1, "category": "Other", "date": null}),
        ] {
            let err = validate_payload(payload(body.clone()), AmountPolicy::Permissive).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{body}");
        }
    }

    #[test]
    fn negative_and_zero_amounts_are_accepted() {
        for amount in [json!(-12.25), json!(0), json!("0")] {
            let draft = validate_payload(
                payload(json!({"description": "Refund", "amount": amount, "category": "Other", "date": "2024-01-01"})),
                AmountPolicy::Strict,
            )
            .unwrap();
            assert!(draft.amount <= 0.0);
        }
    }

    #[test]
    fn permissive_coerces_garbage_to_zero() {
        assert_eq!(coerce_amount(AmountInput::Text(" 7.25 ".into()), AmountPolicy::Permissive).unwrap(), 7.25);
        assert_eq!(coerce_amount(AmountInput::Text("abc".into()), AmountPolicy::Permissive).unwrap(), 0.0);
        assert_eq!(coerce_amount(AmountInput::Text("NaN".into()), AmountPolicy::Permissive).unwrap(), 0.0);
        assert_eq!(coerce_amount(AmountInput::Other(json!(true)), AmountPolicy::Permissive).unwrap(), 0.0);
    }

    #[test]
    fn permissive_keeps_the_leading_number() {
        let permissive = |s: &str| coerce_amount(AmountInput::Text(s.into()), AmountPolicy::Permissive).unwrap();
        assert_eq!(permissive("12.50 USD"), 12.5);
        assert_eq!(permissive("  -3.5kg"), -3.5);
        assert_eq!(permissive(".5x"), 0.5);
        assert_eq!(permissive("7."), 7.0);
        assert_eq!(permissive("1e3 units"), 1000.0);
        assert_eq!(permissive("2e"), 2.0);
        assert_eq!(permissive("4.2.1"), 4.2);
        assert_eq!(permissive("abc"), 0.0);
        assert_eq!(permissive("-"), 0.0);
        assert_eq!(permissive("."), 0.0);
        assert_eq!(permissive("Infinity"), 0.0);
        assert_eq!(permissive("1e999"), 0.0);

        assert!(coerce_amount(AmountInput::Text("12.50 USD".into()), AmountPolicy::Strict).is_err());
    }

    #[test]
    fn strict_rejects_non_numeric_amount_and_bad_dates() {
        assert!(coerce_amount(AmountInput::Text("abc".into()), AmountPolicy::Strict).is_err());
        assert!(coerce_amount(AmountInput::Other(json!([1])), AmountPolicy::Strict).is_err());

        let bad_date = validate_payload(
            payload(json!({"description": "x", "amount": 1, "category": "Other", "date": "2024-02-30"})),
            AmountPolicy::Strict,
        );
        assert!(matches!(bad_date, Err(AppError::Validation(_))));

        let loose = validate_payload(
            payload(json!({"description": "x", "amount": 1, "category": "Other", "date": "last tuesday"})),
            AmountPolicy::Permissive,
        )
        .unwrap();
        assert_eq!(loose.date, "last tuesday");
    }

    #[test]
    fn enrich_joins_known_and_passes_through_unknown_labels() {
        let registry = CategoryRegistry::new(default_categories());
        let base = Expense {
            id: "1".into(),
            user_id: "u".into(),
            description: "Coffee".into(),
            amount: 4.5,
            category: "Food & Dining".into(),
            date: "2024-03-01".into(),
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        let known = enrich(base.clone(), &registry);
        assert_eq!(known.category_color, "#28a745");
        assert_eq!(known.category_name, "Food & Dining");

        let unknown = enrich(Expense { category: "Llamas".into(), ..base }, &registry);
        assert_eq!(unknown.category_color, DEFAULT_CATEGORY_COLOR);
        assert_eq!(unknown.category_name, "Llamas");

        let json = serde_json::to_value(&unknown).unwrap();
        assert_eq!(json["category"], "Llamas");
        assert_eq!(json["user_id"], "u");
    }
}
