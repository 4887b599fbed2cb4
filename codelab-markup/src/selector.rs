use crate::error::{MarkupError, MarkupResult};

/// A parsed selector group (`a, b, c`).
///
/// Covers what lesson authors write against a static document: type and
/// universal selectors, `#id`, `.class`, attribute selectors with every
/// CSS3 operator, the four combinators (` `, `>`, `+`, `~`), the structural
/// pseudo-classes, `:empty`, `:root` and `:not(...)`. Dynamic pseudo-classes
/// and pseudo-elements are rejected at parse time.
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    source: String,
    alternatives: Vec<ComplexSelector>,
}

/// Compound selectors joined by combinators, left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    pub compounds: Vec<Compound>,
    /// `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
    pub combinators: Vec<Combinator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    NextSibling,
    SubsequentSibling,
}

impl Combinator {
    fn is_sibling(self) -> bool {
        matches!(self, Combinator::NextSibling | Combinator::SubsequentSibling)
    }
}

/// A sequence of simple selectors that all apply to one element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    /// Lowercased type name; `None` for `*` or when omitted.
    pub tag: Option<String>,
    pub ids: Vec<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeSelector>,
    pub pseudo_classes: Vec<PseudoClass>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeSelector {
    /// Lowercased attribute name.
    pub name: String,
    pub op: AttributeOp,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeOp {
    Exists,
    Equals(String),
    Includes(String),
    DashMatch(String),
    Prefix(String),
    Suffix(String),
    Substring(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthChild(Nth),
    NthLastChild(Nth),
    NthOfType(Nth),
    NthLastOfType(Nth),
    Empty,
    Root,
    Not(Vec<ComplexSelector>),
}

/// The `an+b` argument of the `:nth-*` pseudo-classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nth {
    pub a: i32,
    pub b: i32,
}

impl Nth {
    /// Whether the 1-based `position` is `a*n + b` for some `n >= 0`.
    pub fn matches(&self, position: i32) -> bool {
        if self.a == 0 {
            return position == self.b;
        }
        let diff = position - self.b;
        diff % self.a == 0 && diff / self.a >= 0
    }
}

/// What the matcher needs to know about an element.
pub trait ElementLike: Sized {
    fn local_name(&self) -> &str;
    fn attribute(&self, name: &str) -> Option<String>;
    fn parent_element(&self) -> Option<Self>;
    fn prev_sibling_element(&self) -> Option<Self>;
    fn next_sibling_element(&self) -> Option<Self>;
    /// No element children and no non-empty text.
    fn has_no_content(&self) -> bool;
}

impl Selector {
    pub fn parse(input: &str) -> MarkupResult<Selector> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(MarkupError::EmptySelector);
        }
        Ok(Selector {
            source: trimmed.to_string(),
            alternatives: parse_list(input, trimmed)?,
        })
    }

    /// The selector text as written (trimmed).
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn alternatives(&self) -> &[ComplexSelector] {
        &self.alternatives
    }

    pub fn matches<E: ElementLike>(&self, element: &E) -> bool {
        self.alternatives.iter().any(|c| c.matches(element))
    }
}

/// Result of matching a complex selector from one compound leftwards.
///
/// The restart variants tell the caller which further candidates cannot
/// succeed, so it stops walking instead of retrying them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Match {
    Matched,
    RestartFromClosestLaterSibling,
    RestartFromClosestDescendant,
    NotMatchedGlobally,
}

impl ComplexSelector {
    pub fn matches<E: ElementLike>(&self, element: &E) -> bool {
        match self.compounds.len() {
            0 => false,
            n => self.match_from(n - 1, element) == Match::Matched,
        }
    }

    fn match_from<E: ElementLike>(&self, index: usize, element: &E) -> Match {
        if !self.compounds[index].matches(element) {
            return Match::RestartFromClosestLaterSibling;
        }
        if index == 0 {
            return Match::Matched;
        }

        let combinator = self.combinators[index - 1];
        let exhausted = if combinator.is_sibling() {
            Match::RestartFromClosestDescendant
        } else {
            Match::NotMatchedGlobally
        };

        let step = |e: &E| {
            if combinator.is_sibling() {
                e.prev_sibling_element()
            } else {
                e.parent_element()
            }
        };

        let mut candidate = step(element);
        loop {
            let Some(next) = candidate else {
                return exhausted;
            };
            let result = self.match_from(index - 1, &next);
            match (result, combinator) {
                (Match::Matched, _)
                | (Match::NotMatchedGlobally, _)
                | (_, Combinator::NextSibling) => return result,
                (_, Combinator::Child) => return Match::RestartFromClosestDescendant,
                (Match::RestartFromClosestDescendant, Combinator::SubsequentSibling) => {
                    return result;
                }
                _ => {}
            }
            candidate = step(&next);
        }
    }
}

impl Compound {
    pub fn matches<E: ElementLike>(&self, element: &E) -> bool {
        if let Some(ref tag) = self.tag {
            if !element.local_name().eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if !self.ids.is_empty() {
            let id = element.attribute("id");
            if !self.ids.iter().all(|want| id.as_deref() == Some(want.as_str())) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class = element.attribute("class").unwrap_or_default();
            let tokens: Vec<&str> = class.split_ascii_whitespace().collect();
            if !self.classes.iter().all(|c| tokens.contains(&c.as_str())) {
                return false;
            }
        }
        self.attributes.iter().all(|a| a.matches(element))
            && self.pseudo_classes.iter().all(|p| p.matches(element))
    }
}

impl AttributeSelector {
    fn matches<E: ElementLike>(&self, element: &E) -> bool {
        let Some(value) = element.attribute(&self.name) else {
            return false;
        };
        match &self.op {
            AttributeOp::Exists => true,
            AttributeOp::Equals(v) => value == *v,
            AttributeOp::Includes(v) => {
                !v.is_empty() && value.split_ascii_whitespace().any(|t| t == v)
            }
            AttributeOp::DashMatch(v) => {
                value == *v || value.starts_with(&format!("{}-", v))
            }
            AttributeOp::Prefix(v) => !v.is_empty() && value.starts_with(v.as_str()),
            AttributeOp::Suffix(v) => !v.is_empty() && value.ends_with(v.as_str()),
            AttributeOp::Substring(v) => !v.is_empty() && value.contains(v.as_str()),
        }
    }
}

impl PseudoClass {
    fn matches<E: ElementLike>(&self, element: &E) -> bool {
        match self {
            PseudoClass::FirstChild => element.prev_sibling_element().is_none(),
            PseudoClass::LastChild => element.next_sibling_element().is_none(),
            PseudoClass::OnlyChild => {
                element.prev_sibling_element().is_none() && element.next_sibling_element().is_none()
            }
            PseudoClass::FirstOfType => position(element, false, true) == 1,
            PseudoClass::LastOfType => position(element, true, true) == 1,
            PseudoClass::OnlyOfType => {
                position(element, false, true) == 1 && position(element, true, true) == 1
            }
            PseudoClass::NthChild(nth) => nth.matches(position(element, false, false)),
            PseudoClass::NthLastChild(nth) => nth.matches(position(element, true, false)),
            PseudoClass::NthOfType(nth) => nth.matches(position(element, false, true)),
            PseudoClass::NthLastOfType(nth) => nth.matches(position(element, true, true)),
            PseudoClass::Empty => element.has_no_content(),
            PseudoClass::Root => element.parent_element().is_none(),
            PseudoClass::Not(list) => !list.iter().any(|c| c.matches(element)),
        }
    }
}

/// 1-based index among element siblings, counted from the end when
/// `from_end`, and among siblings of the same type when `of_type`.
fn position<E: ElementLike>(element: &E, from_end: bool, of_type: bool) -> i32 {
    let step = |e: &E| {
        if from_end {
            e.next_sibling_element()
        } else {
            e.prev_sibling_element()
        }
    };
    let name = element.local_name();
    let mut index = 1;
    let mut current = step(element);
    while let Some(sibling) = current {
        if !of_type || sibling.local_name().eq_ignore_ascii_case(name) {
            index += 1;
        }
        current = step(&sibling);
    }
    index
}

// ─── Parsing ──────────────────────────────────────────────────────────────────

fn invalid(selector: &str, reason: &str) -> MarkupError {
    MarkupError::InvalidSelector {
        selector: selector.to_string(),
        reason: reason.to_string(),
    }
}

fn unsupported(selector: &str, syntax: &str) -> MarkupError {
    MarkupError::UnsupportedSelector {
        selector: selector.to_string(),
        syntax: syntax.to_string(),
    }
}

fn parse_list(selector: &str, list: &str) -> MarkupResult<Vec<ComplexSelector>> {
    split_top_level(list, ',')
        .into_iter()
        .map(|part| {
            let part = part.trim();
            if part.is_empty() {
                Err(invalid(selector, "empty selector in group"))
            } else {
                parse_complex(selector, part)
            }
        })
        .collect()
}

/// Splits on `sep` outside brackets, parentheses and quotes.
fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '[' | '(' => depth += 1,
                ']' | ')' => depth = depth.saturating_sub(1),
                c if c == sep && depth == 0 => {
                    parts.push(&s[start..i]);
                    start = i + c.len_utf8();
                }
                _ => {}
            },
        }
    }
    parts.push(&s[start..]);
    parts
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

struct Cursor<'a> {
    selector: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(selector: &'a str, part: &str) -> Self {
        Self {
            selector,
            chars: part.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn ident(&mut self, what: &str) -> MarkupResult<String> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_char(c)) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(invalid(self.selector, &format!("expected {}", what)));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn quoted(&mut self, quote: char) -> MarkupResult<String> {
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some(c) => out.push(c),
                    None => return Err(invalid(self.selector, "unterminated string")),
                },
                Some(c) => out.push(c),
                None => return Err(invalid(self.selector, "unterminated string")),
            }
        }
    }

    /// Text up to the `)` closing an already consumed `(`.
    fn parenthesized(&mut self) -> MarkupResult<String> {
        let mut depth = 1;
        let mut quote: Option<char> = None;
        let mut out = String::new();
        while let Some(c) = self.bump() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None => match c {
                    '"' | '\'' => quote = Some(c),
                    '(' => depth += 1,
                    ')' => {
                        depth -= 1;
                        if depth == 0 {
                            return Ok(out);
                        }
                    }
                    _ => {}
                },
            }
            out.push(c);
        }
        Err(invalid(self.selector, "expected ')'"))
    }
}

fn parse_complex(selector: &str, part: &str) -> MarkupResult<ComplexSelector> {
    let mut cursor = Cursor::new(selector, part);
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();

    cursor.skip_whitespace();
    loop {
        let start = cursor.pos;
        let compound = parse_compound(&mut cursor)?;
        if cursor.pos == start {
            return Err(invalid(selector, "expected a selector"));
        }
        compounds.push(compound);

        let had_space = cursor.skip_whitespace();
        let combinator = match cursor.peek() {
            None => break,
            Some('>') => Combinator::Child,
            Some('+') => Combinator::NextSibling,
            Some('~') => Combinator::SubsequentSibling,
            Some(_) if had_space => {
                combinators.push(Combinator::Descendant);
                continue;
            }
            Some(c) => {
                return Err(invalid(selector, &format!("unexpected character '{}'", c)));
            }
        };
        cursor.bump();
        cursor.skip_whitespace();
        combinators.push(combinator);
    }

    Ok(ComplexSelector {
        compounds,
        combinators,
    })
}

fn parse_compound(cursor: &mut Cursor) -> MarkupResult<Compound> {
    let mut compound = Compound::default();

    match cursor.peek() {
        Some('*') => {
            cursor.bump();
        }
        Some(c) if is_ident_char(c) => {
            compound.tag = Some(cursor.ident("type selector")?.to_ascii_lowercase());
        }
        _ => {}
    }

    loop {
        match cursor.peek() {
            Some('#') => {
                cursor.bump();
                compound.ids.push(cursor.ident("id after '#'")?);
            }
            Some('.') => {
                cursor.bump();
                compound.classes.push(cursor.ident("class name after '.'")?);
            }
            Some('[') => {
                cursor.bump();
                compound.attributes.push(parse_attribute(cursor)?);
            }
            Some(':') => {
                cursor.bump();
                compound.pseudo_classes.push(parse_pseudo_class(cursor)?);
            }
            _ => break,
        }
    }

    Ok(compound)
}

fn parse_pseudo_class(cursor: &mut Cursor) -> MarkupResult<PseudoClass> {
    if cursor.peek() == Some(':') {
        cursor.bump();
        let name = cursor.ident("pseudo-element name")?;
        return Err(unsupported(cursor.selector, &format!("::{}", name)));
    }

    let name = cursor.ident("pseudo-class name")?.to_ascii_lowercase();
    let argument = if cursor.peek() == Some('(') {
        cursor.bump();
        Some(cursor.parenthesized()?)
    } else {
        None
    };

    let selector = cursor.selector;
    let pseudo = match (name.as_str(), argument) {
        ("first-child", None) => PseudoClass::FirstChild,
        ("last-child", None) => PseudoClass::LastChild,
        ("only-child", None) => PseudoClass::OnlyChild,
        ("first-of-type", None) => PseudoClass::FirstOfType,
        ("last-of-type", None) => PseudoClass::LastOfType,
        ("only-of-type", None) => PseudoClass::OnlyOfType,
        ("empty", None) => PseudoClass::Empty,
        ("root", None) => PseudoClass::Root,
        ("nth-child", Some(arg)) => PseudoClass::NthChild(parse_nth(selector, &arg)?),
        ("nth-last-child", Some(arg)) => PseudoClass::NthLastChild(parse_nth(selector, &arg)?),
        ("nth-of-type", Some(arg)) => PseudoClass::NthOfType(parse_nth(selector, &arg)?),
        ("nth-last-of-type", Some(arg)) => PseudoClass::NthLastOfType(parse_nth(selector, &arg)?),
        ("not", Some(arg)) => {
            if arg.trim().is_empty() {
                return Err(invalid(selector, "empty :not()"));
            }
            PseudoClass::Not(parse_list(selector, arg.trim())?)
        }
        (_, Some(_)) => return Err(unsupported(selector, &format!(":{}()", name))),
        (_, None) => return Err(unsupported(selector, &format!(":{}", name))),
    };
    Ok(pseudo)
}

/// Parses `odd`, `even`, `b`, `an`, `an+b` and `an-b`.
fn parse_nth(selector: &str, arg: &str) -> MarkupResult<Nth> {
    let compact: String = arg
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    let bad = || invalid(selector, &format!("bad nth argument '{}'", arg.trim()));

    match compact.as_str() {
        "odd" => return Ok(Nth { a: 2, b: 1 }),
        "even" => return Ok(Nth { a: 2, b: 0 }),
        "" => return Err(bad()),
        _ => {}
    }

    match compact.split_once('n') {
        Some((a, b)) => {
            let a = match a {
                "" | "+" => 1,
                "-" => -1,
                a => a.parse().map_err(|_| bad())?,
            };
            let b = match b {
                "" => 0,
                b if b.starts_with('+') || b.starts_with('-') => b.parse().map_err(|_| bad())?,
                _ => return Err(bad()),
            };
            Ok(Nth { a, b })
        }
        None => Ok(Nth {
            a: 0,
            b: compact.parse().map_err(|_| bad())?,
        }),
    }
}

fn parse_attribute(cursor: &mut Cursor) -> MarkupResult<AttributeSelector> {
    cursor.skip_whitespace();
    let name = cursor.ident("attribute name")?.to_ascii_lowercase();
    cursor.skip_whitespace();

    let op_char = match cursor.peek() {
        Some(']') => {
            cursor.bump();
            return Ok(AttributeSelector {
                name,
                op: AttributeOp::Exists,
            });
        }
        Some('=') => {
            cursor.bump();
            '='
        }
        Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
            cursor.bump();
            if cursor.bump() != Some('=') {
                return Err(invalid(cursor.selector, "expected '=' in attribute selector"));
            }
            c
        }
        _ => return Err(invalid(cursor.selector, "malformed attribute selector")),
    };

    cursor.skip_whitespace();
    let value = match cursor.peek() {
        Some(q @ ('"' | '\'')) => {
            cursor.bump();
            cursor.quoted(q)?
        }
        _ => cursor.ident("attribute value")?,
    };
    cursor.skip_whitespace();
    if cursor.bump() != Some(']') {
        return Err(invalid(cursor.selector, "expected ']'"));
    }

    let op = match op_char {
        '=' => AttributeOp::Equals(value),
        '~' => AttributeOp::Includes(value),
        '|' => AttributeOp::DashMatch(value),
        '^' => AttributeOp::Prefix(value),
        '$' => AttributeOp::Suffix(value),
        _ => AttributeOp::Substring(value),
    };
    Ok(AttributeSelector { name, op })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlDocument;
    use pretty_assertions::assert_eq;

    const LIST_PAGE: &str = r#"<main>
  <section id="intro">
    <h1>Title</h1>
    <p class="lead">First</p>
    <p>Second</p>
    <ul><li>a</li><li>b</li><li>c</li><li>d</li><li>e</li></ul>
  </section>
  <section><h2>Other</h2><div></div></section>
</main>"#;

    fn count(markup: &str, selector: &str) -> usize {
        let doc = HtmlDocument::parse(markup);
        doc.query_selector_all(&Selector::parse(selector).unwrap()).len()
    }

    fn texts(markup: &str, selector: &str) -> Vec<String> {
        let doc = HtmlDocument::parse(markup);
        doc.query_selector_all(&Selector::parse(selector).unwrap())
            .iter()
            .map(|e| e.text_content())
            .collect()
    }

    #[test]
    fn test_parse_type_selector() {
        let sel = Selector::parse("H1").unwrap();
        assert_eq!(sel.alternatives()[0].compounds[0].tag.as_deref(), Some("h1"));
    }

    #[test]
    fn test_parse_compound() {
        let sel = Selector::parse("button.primary#go[type='submit']").unwrap();
        let c = &sel.alternatives()[0].compounds[0];
        assert_eq!(c.tag.as_deref(), Some("button"));
        assert_eq!(c.classes, vec!["primary"]);
        assert_eq!(c.ids, vec!["go"]);
        assert_eq!(
            c.attributes[0],
            AttributeSelector {
                name: "type".to_string(),
                op: AttributeOp::Equals("submit".to_string())
            }
        );
    }

    #[test]
    fn test_parse_combinators_and_groups() {
        let sel = Selector::parse("main > section p, h1 + p ~ ul").unwrap();
        assert_eq!(sel.alternatives().len(), 2);
        assert_eq!(
            sel.alternatives()[0].combinators,
            vec![Combinator::Child, Combinator::Descendant]
        );
        assert_eq!(
            sel.alternatives()[1].combinators,
            vec![Combinator::NextSibling, Combinator::SubsequentSibling]
        );
    }

    #[test]
    fn test_comma_inside_quotes_and_parens_is_not_a_group() {
        assert_eq!(Selector::parse("[title='a, b']").unwrap().alternatives().len(), 1);
        assert_eq!(Selector::parse("li:not(.a, .b)").unwrap().alternatives().len(), 1);
    }

    #[test]
    fn test_nth_arguments() {
        let parse = |s: &str| parse_nth("x", s).unwrap();
        assert_eq!(parse("odd"), Nth { a: 2, b: 1 });
        assert_eq!(parse("even"), Nth { a: 2, b: 0 });
        assert_eq!(parse("3"), Nth { a: 0, b: 3 });
        assert_eq!(parse("n"), Nth { a: 1, b: 0 });
        assert_eq!(parse("-n + 3"), Nth { a: -1, b: 3 });
        assert_eq!(parse("2n-1"), Nth { a: 2, b: -1 });
        assert!(parse_nth("x", "2x").is_err());
        assert!(parse_nth("x", "n3").is_err());
        assert!(parse_nth("x", "").is_err());
    }

    #[test]
    fn test_nth_positions() {
        let first_three = Nth { a: -1, b: 3 };
        assert!(first_three.matches(1));
        assert!(first_three.matches(3));
        assert!(!first_three.matches(4));
        let odd = Nth { a: 2, b: 1 };
        assert!(odd.matches(5));
        assert!(!odd.matches(4));
    }

    #[test]
    fn test_rejects_dynamic_pseudo_classes_and_elements() {
        let err = Selector::parse("a:hover").unwrap_err();
        assert!(matches!(err, MarkupError::UnsupportedSelector { ref syntax, .. } if syntax == ":hover"));
        assert!(Selector::parse("p::before").is_err());
        assert!(Selector::parse("li:nth-child").is_err());
        assert!(Selector::parse("li:first-child(2)").is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(Selector::parse("  "), Err(MarkupError::EmptySelector)));
        assert!(Selector::parse("div >").is_err());
        assert!(Selector::parse("h1 +").is_err());
        assert!(Selector::parse("[name").is_err());
        assert!(Selector::parse("a,,b").is_err());
        assert!(Selector::parse(".").is_err());
        assert!(Selector::parse("li:not()").is_err());
        assert!(Selector::parse("li:not(.a").is_err());
    }

    #[test]
    fn test_descendant_and_child() {
        assert_eq!(count(LIST_PAGE, "main p"), 2);
        assert_eq!(count(LIST_PAGE, "main > p"), 0);
        assert_eq!(count(LIST_PAGE, "main > section > p"), 2);
        assert_eq!(count(LIST_PAGE, "body main ul li"), 5);
    }

    #[test]
    fn test_descendant_backtracks_past_child() {
        // The nearest `div` has no `section` parent, the outer one does.
        let markup = "<section><div><article><div><span>x</span></div></article></div></section>";
        assert_eq!(count(markup, "section > div span"), 1);
        assert_eq!(count(markup, "article > div span"), 1);
        assert_eq!(count(markup, "main > div span"), 0);
    }

    #[test]
    fn test_sibling_combinators() {
        assert_eq!(texts(LIST_PAGE, "h1 + p"), vec!["First"]);
        assert_eq!(count(LIST_PAGE, "h1 ~ ul"), 1);
        assert_eq!(count(LIST_PAGE, "h1 ~ p"), 2);
        assert_eq!(count(LIST_PAGE, "h1 + ul"), 0);
        assert_eq!(count(LIST_PAGE, "h2 ~ p"), 0);
        assert_eq!(texts(LIST_PAGE, "p.lead + p ~ ul li:first-child"), vec!["a"]);
    }

    #[test]
    fn test_structural_pseudo_classes() {
        assert_eq!(texts(LIST_PAGE, "li:first-child"), vec!["a"]);
        assert_eq!(texts(LIST_PAGE, "li:last-child"), vec!["e"]);
        assert_eq!(texts(LIST_PAGE, "li:nth-child(2n)"), vec!["b", "d"]);
        assert_eq!(texts(LIST_PAGE, "li:nth-child(odd)"), vec!["a", "c", "e"]);
        assert_eq!(texts(LIST_PAGE, "li:nth-last-child(-n+2)"), vec!["d", "e"]);
        assert_eq!(texts(LIST_PAGE, "#intro p:first-of-type"), vec!["First"]);
        assert_eq!(texts(LIST_PAGE, "#intro p:last-of-type"), vec!["Second"]);
        assert_eq!(texts(LIST_PAGE, "#intro p:nth-of-type(2)"), vec!["Second"]);
        assert_eq!(count(LIST_PAGE, "h1:only-of-type"), 1);
        assert_eq!(count(LIST_PAGE, "h1:only-child"), 0);
        assert_eq!(count(LIST_PAGE, "ul:only-of-type"), 1);
        assert_eq!(count(LIST_PAGE, "div:empty"), 1);
        assert_eq!(count(LIST_PAGE, "html:root"), 1);
        assert_eq!(count(LIST_PAGE, "main:root"), 0);
    }

    #[test]
    fn test_not() {
        assert_eq!(texts(LIST_PAGE, "p:not(.lead)"), vec!["Second"]);
        assert_eq!(
            texts(LIST_PAGE, "li:not(:first-child):not(:last-child)"),
            vec!["b", "c", "d"]
        );
        assert_eq!(texts(LIST_PAGE, "section:not(#intro) > h2"), vec!["Other"]);
    }

    #[test]
    fn test_class_matching_uses_class_attribute_tokens() {
        let markup = r#"<div class="wide  grid">a</div><div class="grid">b</div><div className="grid wide">c</div>"#;
        assert_eq!(texts(markup, ".grid.wide"), vec!["a"]);
    }

    #[test]
    fn test_attribute_operators() {
        let markup = r#"<a href="https://example.com/docs" lang="en-US" rel="noopener external">x</a>"#;
        for sel in [
            "[href]",
            "[href^='https']",
            "[href$=docs]",
            "[href*=\"example\"]",
            "[lang|=en]",
            "[rel~=external]",
            "A[HREF]",
        ] {
            assert_eq!(count(markup, sel), 1, "{}", sel);
        }
        assert_eq!(count(markup, "[rel=external]"), 0);
        assert_eq!(count(markup, "[title]"), 0);
    }

    #[test]
    fn test_universal() {
        assert_eq!(count("<span></span>", "body > *"), 1);
        assert_eq!(count("<span></span>", "*"), 4);
    }
}
