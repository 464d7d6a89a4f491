use scraper::{Html, Selector};

/// Matches the storefront's size selector buttons, enabled or disabled.
pub const SIZE_BUTTON_SELECTOR: &str = "button[class*='size-buttons-size-button']";

/// Class carried by the button when the size cannot be purchased.
const DISABLED_MARKER_CLASS: &str = "size-buttons-size-button-disabled";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeAvailability {
    InStock,
    OutOfStock,
    /// No marker element for the size was found; the page may not have
    /// rendered, or the markup changed. Treated as not-available.
    Unknown,
}

impl SizeAvailability {
    pub fn is_in_stock(&self) -> bool {
        matches!(self, SizeAvailability::InStock)
    }
}

/// Classifies one size label against a rendered product page.
///
/// A size is only reported in stock when its marker element is present
/// without the disabled class. A missing marker is `Unknown` rather than
/// a verdict in either direction.
pub fn classify_size(html: &str, size_label: &str) -> SizeAvailability {
    let document = Html::parse_document(html);
    let button_selector =
        Selector::parse(SIZE_BUTTON_SELECTOR).expect("size button selector is valid CSS");
    let label_selector = Selector::parse("p").expect("label selector is valid CSS");

    let wanted = size_label.trim();

    for button in document.select(&button_selector) {
        // The label lives in a <p> inside the button; fall back to the
        // button's own text for markup without the inner element.
        let matches_label = button
            .select(&label_selector)
            .any(|label| label.text().collect::<String>().trim() == wanted)
            || button.text().collect::<String>().trim() == wanted;

        if !matches_label {
            continue;
        }

        let disabled = button
            .value()
            .attr("class")
            .map(|classes| {
                classes
                    .split_whitespace()
                    .any(|class| class == DISABLED_MARKER_CLASS)
            })
            .unwrap_or(false);

        return if disabled {
            SizeAvailability::OutOfStock
        } else {
            SizeAvailability::InStock
        };
    }

    SizeAvailability::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size_button(label: &str, disabled: bool) -> String {
        let classes = if disabled {
            "size-buttons-size-button size-buttons-size-button-disabled"
        } else {
            "size-buttons-size-button"
        };
        format!(
            r#"<button class="{}"><p class="size-buttons-unified-size">{}</p></button>"#,
            classes, label
        )
    }

    fn page(buttons: &[String]) -> String {
        format!(
            "<html><body><div class=\"size-buttons-container\">{}</div></body></html>",
            buttons.join("")
        )
    }

    #[test]
    fn test_disabled_marker_means_out_of_stock() {
        let html = page(&[size_button("M", true)]);
        assert_eq!(classify_size(&html, "M"), SizeAvailability::OutOfStock);
    }

    #[test]
    fn test_enabled_marker_means_in_stock() {
        let html = page(&[size_button("M", false)]);
        assert_eq!(classify_size(&html, "M"), SizeAvailability::InStock);
    }

    #[test]
    fn test_sibling_sizes_do_not_affect_the_target() {
        let html = page(&[
            size_button("S", true),
            size_button("M", false),
            size_button("L", true),
        ]);
        assert_eq!(classify_size(&html, "M"), SizeAvailability::InStock);
    }

    #[test]
    fn test_target_disabled_among_enabled_siblings() {
        let html = page(&[
            size_button("S", false),
            size_button("M", true),
            size_button("L", false),
        ]);
        assert_eq!(classify_size(&html, "M"), SizeAvailability::OutOfStock);
    }

    #[test]
    fn test_missing_size_markup_is_unknown() {
        let html = "<html><body><h1>Product</h1></body></html>";
        assert_eq!(classify_size(html, "M"), SizeAvailability::Unknown);
    }

    #[test]
    fn test_label_absent_from_selector_is_unknown() {
        let html = page(&[size_button("S", false), size_button("L", false)]);
        assert_eq!(classify_size(&html, "M"), SizeAvailability::Unknown);
    }

    #[test]
    fn test_label_whitespace_is_trimmed() {
        let html = page(&[size_button(" M ", true)]);
        assert_eq!(classify_size(&html, "M"), SizeAvailability::OutOfStock);
    }

    #[test]
    fn test_label_match_is_exact_not_substring() {
        // "XXL" must not satisfy a check for "XL".
        let html = page(&[size_button("XXL", false)]);
        assert_eq!(classify_size(&html, "XL"), SizeAvailability::Unknown);
    }

    #[test]
    fn test_button_without_inner_label_element() {
        let html = r#"<html><body>
            <button class="size-buttons-size-button size-buttons-size-button-disabled">M</button>
        </body></html>"#;
        assert_eq!(classify_size(html, "M"), SizeAvailability::OutOfStock);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let html = page(&[size_button("M", false)]);
        let first = classify_size(&html, "M");
        let second = classify_size(&html, "M");
        assert_eq!(first, second);
    }

    #[test]
    fn test_is_in_stock_only_for_in_stock() {
        assert!(SizeAvailability::InStock.is_in_stock());
        assert!(!SizeAvailability::OutOfStock.is_in_stock());
        assert!(!SizeAvailability::Unknown.is_in_stock());
    }
}
