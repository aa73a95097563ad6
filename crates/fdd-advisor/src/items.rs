//! The 23 legally mandated disclosure items of a Franchise Disclosure
//! Document. Fixed domain knowledge; never created or destroyed at runtime.

/// Item 19 carries financial performance representations and triggers the
/// disclosure disclaimer.
pub const FINANCIAL_PERFORMANCE_ITEM: u8 = 19;

/// Item 23 is the buyer's receipt page; it is excluded from answer sources.
pub const RECEIPT_ITEM: u8 = 23;

pub const ITEM_COUNT: u8 = 23;

/// Official title of a disclosure item, or `None` outside `1..=23`.
pub fn item_title(item: u8) -> Option<&'static str> {
    let title = match item {
        1 => "The Franchisor and Any Parents, Predecessors, and Affiliates",
        2 => "Business Experience",
        3 => "Litigation",
        4 => "Bankruptcy",
        5 => "Initial Fees",
        6 => "Other Fees",
        7 => "Estimated Initial Investment",
        8 => "Restrictions on Sources of Products and Services",
        9 => "Franchisee's Obligations",
        10 => "Financing",
        11 => "Franchisor's Assistance, Advertising, Computer Systems, and Training",
        12 => "Territory",
        13 => "Trademarks",
        14 => "Patents, Copyrights, and Proprietary Information",
        15 => "Obligation to Participate in the Actual Operation of the Franchise Business",
        16 => "Restrictions on What the Franchisee May Sell",
        17 => "Renewal, Termination, Transfer, and Dispute Resolution",
        18 => "Public Figures",
        19 => "Financial Performance Representations",
        20 => "Outlets and Franchisee Information",
        21 => "Financial Statements",
        22 => "Contracts",
        23 => "Receipts",
        _ => return None,
    };
    Some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_items_have_titles() {
        for item in 1..=ITEM_COUNT {
            assert!(item_title(item).is_some(), "missing title for item {}", item);
        }
        assert!(item_title(0).is_none());
        assert!(item_title(24).is_none());
    }

    #[test]
    fn test_item_19_is_financial_performance() {
        assert_eq!(
            item_title(FINANCIAL_PERFORMANCE_ITEM),
            Some("Financial Performance Representations")
        );
    }
}
