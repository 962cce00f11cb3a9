//! Menu catalog and product descriptors.
//!
//! A [`Product`] is the typed replacement for the `data-*` attributes the
//! order page carries on each menu card: id, name, price, tags, option lists
//! and default selections.

use boba_lab_core::{ProductId, Rupiah};
use serde::{Deserialize, Serialize};

/// Default ice level when none is chosen.
pub const DEFAULT_ICE: &str = "Normal Ice";
/// Default sweetness when none is chosen.
pub const DEFAULT_SWEETNESS: &str = "Normal Sugar";
/// Topping value meaning "no topping".
pub const NO_TOPPING: &str = "Tanpa Tambahan";

/// Tag filter value that matches every product.
pub const ALL_TAGS: &str = "all";

/// A fully resolved option selection for one drink.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOptions {
    pub ice: String,
    pub sweetness: String,
    pub topping: String,
}

impl Default for SelectedOptions {
    fn default() -> Self {
        Self {
            ice: DEFAULT_ICE.to_string(),
            sweetness: DEFAULT_SWEETNESS.to_string(),
            topping: NO_TOPPING.to_string(),
        }
    }
}

impl SelectedOptions {
    /// Human-readable label, e.g. `Less Ice • Normal Sugar • Boba`.
    ///
    /// The topping is left out when it is [`NO_TOPPING`].
    #[must_use]
    pub fn label(&self) -> String {
        let mut readable = vec![self.ice.as_str(), self.sweetness.as_str()];
        if !self.topping.is_empty() && self.topping != NO_TOPPING {
            readable.push(self.topping.as_str());
        }
        readable.join(" • ")
    }
}

/// What the customer picked on a menu card. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionChoice {
    #[serde(default)]
    pub ice: Option<String>,
    #[serde(default)]
    pub sweetness: Option<String>,
    #[serde(default)]
    pub topping: Option<String>,
}

impl OptionChoice {
    /// A choice with every field set.
    #[must_use]
    pub fn new(
        ice: impl Into<String>,
        sweetness: impl Into<String>,
        topping: impl Into<String>,
    ) -> Self {
        Self {
            ice: Some(ice.into()),
            sweetness: Some(sweetness.into()),
            topping: Some(topping.into()),
        }
    }
}

/// Option values a product offers. An empty list accepts any value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionLists {
    #[serde(default)]
    pub ice: Vec<String>,
    #[serde(default)]
    pub sweetness: Vec<String>,
    #[serde(default)]
    pub topping: Vec<String>,
}

/// A menu product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub unit_price: Rupiah,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub options: OptionLists,
    #[serde(default)]
    pub defaults: SelectedOptions,
}

impl Product {
    /// Resolve a partial choice against this product's option lists.
    ///
    /// Blank fields fall back to the product defaults. When the product
    /// declares an option list, a value outside it also falls back, and a
    /// case-insensitive match is replaced by the list's spelling.
    #[must_use]
    pub fn normalize(&self, choice: &OptionChoice) -> SelectedOptions {
        SelectedOptions {
            ice: pick(choice.ice.as_deref(), &self.options.ice, &self.defaults.ice),
            sweetness: pick(
                choice.sweetness.as_deref(),
                &self.options.sweetness,
                &self.defaults.sweetness,
            ),
            topping: pick(
                choice.topping.as_deref(),
                &self.options.topping,
                &self.defaults.topping,
            ),
        }
    }

    /// Returns true if the product carries `tag` (case-insensitive).
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t.trim().eq_ignore_ascii_case(tag))
    }

    /// A product is usable only with a non-blank id and name.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.id.is_blank() && !self.name.trim().is_empty()
    }
}

fn pick(choice: Option<&str>, offered: &[String], default: &str) -> String {
    let Some(value) = choice.map(str::trim).filter(|v| !v.is_empty()) else {
        return default.to_string();
    };

    if offered.is_empty() {
        return value.to_string();
    }

    offered
        .iter()
        .find(|o| o.eq_ignore_ascii_case(value))
        .map_or_else(|| default.to_string(), Clone::clone)
}

/// The set of products shown on the order page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Create a catalog from a list of products.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The built-in Boba Lab menu.
    #[must_use]
    pub fn boba_lab_menu() -> Self {
        let options = OptionLists {
            ice: strings(&["Normal Ice", "Less Ice", "No Ice"]),
            sweetness: strings(&["Normal Sugar", "Less Sugar", "Half Sugar", "No Sugar"]),
            topping: strings(&[NO_TOPPING, "Boba", "Pudding", "Grass Jelly", "Cheese Foam"]),
        };

        let item = |id: &str, name: &str, price: u64, tags: &[&str], description: &str| Product {
            id: ProductId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            unit_price: Rupiah::new(price),
            tags: strings(tags),
            options: options.clone(),
            defaults: SelectedOptions::default(),
        };

        Self::new(vec![
            item(
                "brown-sugar",
                "Brown Sugar Boba",
                25_000,
                &["signature", "milk"],
                "Susu segar dengan boba brown sugar karamel.",
            ),
            item(
                "caramel",
                "Caramel Milk Tea",
                23_000,
                &["milk", "tea"],
                "Teh hitam dan susu dengan saus karamel.",
            ),
            item(
                "green-milk",
                "Green Milk Tea",
                22_000,
                &["milk", "tea"],
                "Teh hijau melati yang lembut dengan susu.",
            ),
            item(
                "houjicha",
                "Houjicha Latte",
                27_000,
                &["signature", "tea"],
                "Teh hijau sangrai khas Jepang dengan rasa smoky.",
            ),
            item(
                "lychee",
                "Lychee Tea",
                20_000,
                &["fruit", "tea"],
                "Teh segar dengan potongan leci.",
            ),
            item(
                "mango",
                "Mango Smoothie",
                24_000,
                &["fruit"],
                "Mangga harum manis yang diblender dingin.",
            ),
            item(
                "matcha",
                "Matcha Latte",
                28_000,
                &["signature", "milk"],
                "Matcha Uji premium dengan susu segar.",
            ),
            item(
                "strawberry",
                "Strawberry Yakult",
                22_000,
                &["fruit"],
                "Stroberi segar dan yakult yang menyegarkan.",
            ),
            item(
                "taro",
                "Taro Milk Tea",
                23_000,
                &["milk"],
                "Talas ungu creamy dengan teh susu.",
            ),
        ])
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Iterate over products in menu order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Returns true if the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// Search box and tag buttons above the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuFilter {
    pub search: String,
    pub tag: String,
}

impl Default for MenuFilter {
    fn default() -> Self {
        Self {
            search: String::new(),
            tag: ALL_TAGS.to_string(),
        }
    }
}

/// Result of filtering the menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    /// IDs of products that stay visible, in menu order.
    pub visible: Vec<ProductId>,
    /// Whether the "no menu matches" message should show.
    pub show_empty_message: bool,
}

impl MenuFilter {
    /// Returns true if `product` passes both the search and the tag filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let search = self.search.trim().to_lowercase();
        let matches_search = search.is_empty()
            || product.name.to_lowercase().contains(&search)
            || product.description.to_lowercase().contains(&search);

        let tag = self.tag.trim();
        let matches_tag = tag.is_empty() || tag.eq_ignore_ascii_case(ALL_TAGS) || product.has_tag(tag);

        matches_search && matches_tag
    }

    /// Apply the filter to a catalog.
    #[must_use]
    pub fn apply(&self, catalog: &Catalog) -> MenuView {
        let visible: Vec<ProductId> = catalog
            .iter()
            .filter(|p| self.matches(p))
            .map(|p| p.id.clone())
            .collect();

        MenuView {
            show_empty_message: visible.is_empty(),
            visible,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn matcha() -> Product {
        Catalog::boba_lab_menu()
            .get(&ProductId::new("matcha"))
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_normalize_missing_fields_use_defaults() {
        let options = matcha().normalize(&OptionChoice::default());
        assert_eq!(options, SelectedOptions::default());
    }

    #[test]
    fn test_normalize_blank_and_unknown_values_fall_back() {
        let choice = OptionChoice {
            ice: Some("   ".to_string()),
            sweetness: Some("Extra Sugar".to_string()),
            topping: Some("boba".to_string()),
        };
        let options = matcha().normalize(&choice);
        assert_eq!(options.ice, DEFAULT_ICE);
        assert_eq!(options.sweetness, DEFAULT_SWEETNESS);
        // Matched case-insensitively, canonical spelling kept
        assert_eq!(options.topping, "Boba");
    }

    #[test]
    fn test_normalize_without_option_lists_accepts_any_value() {
        let mut product = matcha();
        product.options = OptionLists::default();
        let options = product.normalize(&OptionChoice::new("Extra Ice", "Less Sugar", "Oreo"));
        assert_eq!(options.ice, "Extra Ice");
        assert_eq!(options.topping, "Oreo");
    }

    #[test]
    fn test_label_hides_empty_topping() {
        assert_eq!(SelectedOptions::default().label(), "Normal Ice • Normal Sugar");
        let options = SelectedOptions {
            topping: "Pudding".to_string(),
            ..SelectedOptions::default()
        };
        assert_eq!(options.label(), "Normal Ice • Normal Sugar • Pudding");
    }

    #[test]
    fn test_product_validity() {
        let mut product = matcha();
        assert!(product.is_valid());
        product.name = " ".to_string();
        assert!(!product.is_valid());
    }

    #[test]
    fn test_filter_default_shows_everything() {
        let catalog = Catalog::boba_lab_menu();
        let view = MenuFilter::default().apply(&catalog);
        assert_eq!(view.visible.len(), catalog.len());
        assert!(!view.show_empty_message);
    }

    #[test]
    fn test_filter_by_tag() {
        let catalog = Catalog::boba_lab_menu();
        let filter = MenuFilter {
            tag: "fruit".to_string(),
            ..MenuFilter::default()
        };
        let view = filter.apply(&catalog);
        let ids: Vec<&str> = view.visible.iter().map(ProductId::as_str).collect();
        assert_eq!(ids, vec!["lychee", "mango", "strawberry"]);
    }

    #[test]
    fn test_filter_search_matches_name_or_description() {
        let catalog = Catalog::boba_lab_menu();
        let by_name = MenuFilter {
            search: "  TARO ".to_string(),
            ..MenuFilter::default()
        };
        assert_eq!(by_name.apply(&catalog).visible, vec![ProductId::new("taro")]);

        let by_description = MenuFilter {
            search: "smoky".to_string(),
            ..MenuFilter::default()
        };
        assert_eq!(
            by_description.apply(&catalog).visible,
            vec![ProductId::new("houjicha")]
        );
    }

    #[test]
    fn test_filter_no_match_shows_empty_message() {
        let catalog = Catalog::boba_lab_menu();
        let filter = MenuFilter {
            search: "kopi".to_string(),
            tag: "fruit".to_string(),
        };
        let view = filter.apply(&catalog);
        assert!(view.visible.is_empty());
        assert!(view.show_empty_message);
    }

    #[test]
    fn test_catalog_deserializes_from_json() {
        let json = r#"[{"id": "x", "name": "X Tea", "unit_price": 10000}]"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let product = catalog.get(&ProductId::new("x")).unwrap();
        assert_eq!(product.unit_price, Rupiah::new(10_000));
        assert_eq!(product.defaults, SelectedOptions::default());
    }
}
