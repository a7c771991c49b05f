//! HTTP span helpers.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = normalise_path_for_span_name(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

/// Replace id-like segments so route cardinality stays bounded.
fn normalise_path_for_span_name(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let segments: Vec<&str> = path
        .trim_start_matches('/')
        .split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                "{id}"
            } else if Uuid::try_parse(segment).is_ok() {
                "{uuid}"
            } else {
                segment
            }
        })
        .collect();

    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_are_replaced() {
        let names = request_span_name("GET", "/orders/42");

        assert_eq!(names.otel_path, "/orders/{id}");
        assert_eq!(names.otel_span_name, "GET /orders/{id}");
    }

    #[test]
    fn hyphenated_and_simple_uuids_are_replaced() {
        assert_eq!(
            normalise_path_for_span_name("/sessions/67e55044-10b1-426f-9247-bb680e5fe0c8"),
            "/sessions/{uuid}"
        );
        assert_eq!(
            normalise_path_for_span_name("/sessions/67e5504410b1426f9247bb680e5fe0c8"),
            "/sessions/{uuid}"
        );
    }

    #[test]
    fn static_paths_are_untouched() {
        assert_eq!(normalise_path_for_span_name("/"), "/");
        assert_eq!(normalise_path_for_span_name("/user/addresses"), "/user/addresses");
        assert_eq!(normalise_path_for_span_name("/cart/"), "/cart/");
    }
}
