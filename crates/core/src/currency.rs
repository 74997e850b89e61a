//! ISO currency code to display symbol lookup.

/// Currency symbols for the currencies the demo catalog may price in.
const CURRENCY_SYMBOLS: &[(&str, &str)] = &[
    ("USD", "$"),  // US Dollar
    ("EUR", "€"),  // Euro
    ("CRC", "₡"),  // Costa Rican Colón
    ("GBP", "£"),  // British Pound Sterling
    ("ILS", "₪"),  // Israeli New Sheqel
    ("INR", "₹"),  // Indian Rupee
    ("JPY", "¥"),  // Japanese Yen
    ("KRW", "₩"),  // South Korean Won
    ("NGN", "₦"),  // Nigerian Naira
    ("PHP", "₱"),  // Philippine Peso
    ("PLN", "zł"), // Polish Zloty
    ("PYG", "₲"),  // Paraguayan Guarani
    ("THB", "฿"),  // Thai Baht
    ("UAH", "₴"),  // Ukrainian Hryvnia
    ("VND", "₫"),  // Vietnamese Dong
];

/// Look up the display symbol for an ISO 4217 currency code.
///
/// The payment provider reports codes lowercase; lookup is case-insensitive.
#[must_use]
pub fn symbol(code: &str) -> Option<&'static str> {
    CURRENCY_SYMBOLS
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
        .map(|&(_, symbol)| symbol)
}

/// Display symbol with the code itself as fallback for unknown currencies.
#[must_use]
pub fn symbol_or_code(code: &str) -> String {
    symbol(code).map_or_else(|| code.to_uppercase(), str::to_string)
}
