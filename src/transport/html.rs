use scraper::{ElementRef, Html};

use crate::domain::Token;

/// Minimal view of an HTML tree needed to locate form inputs.
///
/// Keeps the token search independent of the parser crate.
pub trait HtmlNode: Sized {
    /// Whether this node is an `<input>` element.
    fn is_input(&self) -> bool;

    fn attr(&self, name: &str) -> Option<&str>;

    fn first_child(&self) -> Option<Self>;

    fn next_sibling(&self) -> Option<Self>;
}

impl HtmlNode for ElementRef<'_> {
    fn is_input(&self) -> bool {
        self.value().name() == "input"
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn first_child(&self) -> Option<Self> {
        self.children().find_map(ElementRef::wrap)
    }

    fn next_sibling(&self) -> Option<Self> {
        self.next_siblings().find_map(ElementRef::wrap)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScrapeError {
    #[error("input {field}: not found")]
    NotFound { field: &'static str },

    #[error("input {field}: value attribute not found")]
    ValueMissing { field: &'static str },
}

/// Depth-first, pre-order search; the first match in document order wins.
pub fn find_first<N, F>(root: N, mut matches: F) -> Option<N>
where
    N: HtmlNode,
    F: FnMut(&N) -> bool,
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if matches(&node) {
            return Some(node);
        }

        let mut children = Vec::new();
        let mut next = node.first_child();
        while let Some(child) = next {
            next = child.next_sibling();
            children.push(child);
        }
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Locate `<input name="sms_submit[_token]" value="...">` below `root`.
pub fn find_token<N: HtmlNode>(root: N) -> Result<Token, ScrapeError> {
    let input = find_first(root, |node| {
        node.is_input() && node.attr("name") == Some(Token::FIELD)
    })
    .ok_or(ScrapeError::NotFound { field: Token::FIELD })?;

    input
        .attr("value")
        .map(Token::new)
        .ok_or(ScrapeError::ValueMissing { field: Token::FIELD })
}

/// Parse a full HTML document and extract the anti-forgery token from it.
pub fn extract_token(document: &str) -> Result<Token, ScrapeError> {
    let html = Html::parse_document(document);
    find_token(html.root_element())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Mano Labas</title></head>
  <body>
    <form name="sms_submit" method="post">
      <input type="text" id="sms_submit_recipientNumber" name="sms_submit[recipientNumber]" />
      <textarea name="sms_submit[textMessage]"></textarea>
      <input
          type="hidden"
          id="sms_submit__token"
          name="sms_submit[_token]"
          value="pXoZYkVsiTmj0KFuILwx4EBFbtCY2PK0JHqWinrXuO4"
          class="form-control input-material" />
    </form>
  </body>
</html>"#;

    #[test]
    fn extracts_token_from_home_page() {
        let token = extract_token(HOME_PAGE).unwrap();
        assert_eq!(
            token.as_str(),
            "pXoZYkVsiTmj0KFuILwx4EBFbtCY2PK0JHqWinrXuO4"
        );
    }

    #[test]
    fn attribute_order_does_not_matter() {
        let html = r#"<input value="v1" class="x" name="sms_submit[_token]" type="hidden">"#;
        assert_eq!(extract_token(html).unwrap().as_str(), "v1");
    }

    #[test]
    fn first_match_in_document_order_wins() {
        // The first token is nested deeper than the second; pre-order must still
        // reach it first.
        let html = r#"<html><body>
            <div><section><p>
              <input name="sms_submit[_token]" value="first">
            </p></section></div>
            <input name="sms_submit[_token]" value="second">
        </body></html>"#;

        for _ in 0..10 {
            assert_eq!(extract_token(html).unwrap().as_str(), "first");
        }
    }

    #[test]
    fn non_input_elements_with_the_name_are_ignored() {
        let html = r#"<body>
            <textarea name="sms_submit[_token]">nope</textarea>
            <input name="sms_submit[_token]" value="yes">
        </body>"#;
        assert_eq!(extract_token(html).unwrap().as_str(), "yes");
    }

    #[test]
    fn name_comparison_is_exact() {
        let html = r#"<input name="SMS_SUBMIT[_token]" value="upper">
            <input name=" sms_submit[_token]" value="padded">"#;
        assert_eq!(
            extract_token(html).unwrap_err(),
            ScrapeError::NotFound { field: Token::FIELD }
        );
    }

    #[test]
    fn missing_input_is_reported() {
        let html = "<html><body><p>Prisijunkite</p></body></html>";
        assert_eq!(
            extract_token(html).unwrap_err(),
            ScrapeError::NotFound { field: Token::FIELD }
        );
    }

    #[test]
    fn missing_value_attribute_is_reported() {
        let html = r#"<input type="hidden" name="sms_submit[_token]">"#;
        assert_eq!(
            extract_token(html).unwrap_err(),
            ScrapeError::ValueMissing { field: Token::FIELD }
        );
    }

    #[test]
    fn empty_value_is_a_valid_token() {
        let html = r#"<input name="sms_submit[_token]" value="">"#;
        assert_eq!(extract_token(html).unwrap().as_str(), "");
    }

    #[derive(Debug, Clone)]
    struct Tree {
        nodes: std::rc::Rc<Vec<FakeNode>>,
        idx: usize,
    }

    #[derive(Debug)]
    struct FakeNode {
        input: bool,
        attrs: Vec<(&'static str, &'static str)>,
        first_child: Option<usize>,
        next_sibling: Option<usize>,
    }

    impl HtmlNode for Tree {
        fn is_input(&self) -> bool {
            self.nodes[self.idx].input
        }

        fn attr(&self, name: &str) -> Option<&str> {
            self.nodes[self.idx]
                .attrs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
        }

        fn first_child(&self) -> Option<Self> {
            self.nodes[self.idx].first_child.map(|idx| Tree {
                nodes: self.nodes.clone(),
                idx,
            })
        }

        fn next_sibling(&self) -> Option<Self> {
            self.nodes[self.idx].next_sibling.map(|idx| Tree {
                nodes: self.nodes.clone(),
                idx,
            })
        }
    }

    #[test]
    fn search_works_over_any_node_implementation() {
        // 0
        // ├── 1
        // │   └── 3 (input, value=deep)
        // └── 2 (input, value=shallow)
        let field = Token::FIELD;
        let nodes = vec![
            FakeNode {
                input: false,
                attrs: vec![],
                first_child: Some(1),
                next_sibling: None,
            },
            FakeNode {
                input: false,
                attrs: vec![],
                first_child: Some(3),
                next_sibling: Some(2),
            },
            FakeNode {
                input: true,
                attrs: vec![("name", field), ("value", "shallow")],
                first_child: None,
                next_sibling: None,
            },
            FakeNode {
                input: true,
                attrs: vec![("name", field), ("value", "deep")],
                first_child: None,
                next_sibling: None,
            },
        ];
        let root = Tree {
            nodes: std::rc::Rc::new(nodes),
            idx: 0,
        };

        assert_eq!(find_token(root).unwrap().as_str(), "deep");
    }
}
