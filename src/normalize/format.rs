use crate::collections::parse_price;
use scraper::Html;

/// Convert a rendered HTML fragment to plain text.
///
/// Entities are decoded and whitespace collapsed to single spaces.
pub fn html_to_text(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return collapse_whitespace(html);
    }

    let fragment = Html::parse_fragment(html);
    let text: String = fragment.root_element().text().collect();
    collapse_whitespace(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map accented Latin letters to their base letter, lowercased
pub fn fold_char(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'Á' | 'À' | 'Â' | 'Ä' | 'Ã' | 'Å' => 'a',
        'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'Ó' | 'Ò' | 'Ô' | 'Ö' | 'Õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'Ú' | 'Ù' | 'Û' | 'Ü' => 'u',
        'ñ' | 'Ñ' => 'n',
        'ç' | 'Ç' => 'c',
        other => other.to_lowercase().next().unwrap_or(other),
    }
}

/// URL slug for a title: "Casa en Peñalolén" -> "casa-en-penalolen"
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().map(fold_char) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Append the square-metre unit to a bare number
pub fn area_with_unit(area: &str) -> String {
    let area = area.trim();
    if area.is_empty() || area.chars().any(char::is_alphabetic) {
        return area.to_string();
    }
    format!("{} m²", area)
}

/// Format a raw price string for display, e.g. "1250000" -> "$1,250,000".
///
/// Returns `None` when the price does not parse to a positive amount.
pub fn format_price(price: &str, symbol: &str) -> Option<String> {
    let amount = parse_price(price);
    if amount <= 0.0 {
        return None;
    }

    let total_cents = (amount * 100.0).round() as u64;
    let whole = total_cents / 100;
    let cents = total_cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if cents > 0 {
        Some(format!("{}{}.{:02}", symbol, grouped, cents))
    } else {
        Some(format!("{}{}", symbol, grouped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_strips_tags_and_entities() {
        assert_eq!(
            html_to_text("<p>Hermosa casa&nbsp;con   vista &amp; jardín [&hellip;]</p>\n"),
            "Hermosa casa con vista & jardín […]"
        );
        assert_eq!(html_to_text("Casa &#8211; Centro"), "Casa – Centro");
        assert_eq!(html_to_text("  plain   text "), "plain text");
        assert_eq!(html_to_text(""), "");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Casa en Peñalolén"), "casa-en-penalolen");
        assert_eq!(slugify("  Depto. 3D/2B -- Centro!  "), "depto-3d-2b-centro");
        assert_eq!(slugify("¡¿!"), "");
    }

    #[test]
    fn test_area_with_unit() {
        assert_eq!(area_with_unit("120"), "120 m²");
        assert_eq!(area_with_unit("85.5"), "85.5 m²");
        assert_eq!(area_with_unit("120 m2"), "120 m2");
        assert_eq!(area_with_unit(""), "");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price("1250000", "$"), Some("$1,250,000".to_string()));
        assert_eq!(format_price("€300", "€"), Some("€300".to_string()));
        assert_eq!(format_price("999.5", "$"), Some("$999.50".to_string()));
        // Rounding to cents carries into the whole amount
        assert_eq!(format_price("999.999", "$"), Some("$1,000".to_string()));
        assert_eq!(format_price("1.996", "$"), Some("$2".to_string()));
        assert_eq!(format_price("1000", "UF "), Some("UF 1,000".to_string()));
        assert_eq!(format_price("", "$"), None);
        assert_eq!(format_price("0", "$"), None);
        assert_eq!(format_price("Consultar", "$"), None);
    }
}
