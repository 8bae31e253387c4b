//! The fixed list of spending categories.

/// The categories an entry can carry, in the order the category summary
/// reports them.
///
/// Entries are stored with whatever category text the client sent; an entry
/// whose category matches none of these falls outside every summary bucket
/// but still counts towards the currency totals.
pub const CATEGORIES: [&str; 9] = [
    "Food",
    "Travel",
    "Shopping",
    "Bills",
    "Fun",
    "Health",
    "Groceries",
    "Saving",
    "Other",
];
