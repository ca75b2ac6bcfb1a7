use chrono::Utc;

use crate::domain::{ExpenseInput, ExpenseItem};

/// Turns an inbound payload into a storable item.
pub trait ItemConverter {
    fn convert(&self, input: &ExpenseInput) -> ExpenseItem;
}

/// Assigns a random v4 id and stamps the item with the current UTC time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemItemConverter;

impl ItemConverter for SystemItemConverter {
    fn convert(&self, input: &ExpenseInput) -> ExpenseItem {
        ExpenseItem::new(
            input.email.clone(),
            input.title.clone(),
            input.amount,
            Utc::now(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_copies_fields_and_stamps_date() {
        let input = ExpenseInput::new("a@b.com", "Lunch", Some(1250));
        let item = SystemItemConverter.convert(&input);

        assert_eq!(item.email, "a@b.com");
        assert_eq!(item.title, "Lunch");
        assert_eq!(item.amount, Some(1250));
        assert!(item.expense_instant().is_some());
    }

    #[test]
    fn test_convert_assigns_fresh_ids() {
        let input = ExpenseInput::new("a@b.com", "Lunch", None);
        let first = SystemItemConverter.convert(&input);
        let second = SystemItemConverter.convert(&input);

        assert_ne!(first.id, second.id);
        assert_eq!(first.amount, None);
    }
}
