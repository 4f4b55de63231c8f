use crate::Segment;

/// Render segments as a single paragraph, joined by spaces, timing dropped
pub fn format_paragraph(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_paragraph() {
        let segments = vec![Segment::new("hello"), Segment::new("world")];
        assert_eq!(format_paragraph(&segments), "hello world");
    }

    #[test]
    fn test_format_paragraph_keeps_order() {
        let segments = vec![
            Segment {
                text: "second line".to_string(),
                start: 4.0,
                duration: 1.0,
            },
            Segment {
                text: "first line".to_string(),
                start: 0.0,
                duration: 1.0,
            },
        ];
        assert_eq!(format_paragraph(&segments), "second line first line");
    }

    #[test]
    fn test_format_paragraph_empty() {
        assert_eq!(format_paragraph(&[]), "");
    }
}
