use std::vec::IntoIter;


pub struct TextBlocksIter<'text> {
    iter: IntoIter<&'text str>
}

impl<'text> TextBlocksIter<'text> {
    pub fn new(text: &'text str, blocks_separator: &str) -> Self {
        let blocks: Vec<&str> = text.split(blocks_separator)
            .map(|w| w.trim())
            .filter(|w| !w.is_empty())
            .collect();

        TextBlocksIter { iter: blocks.into_iter() }
    }
}

impl<'text> Iterator for TextBlocksIter<'text> {
    type Item = &'text str;

    fn next(&mut self) -> Option<Self::Item> { self.iter.next() }
}


/// Non-empty, trimmed lines. Lines starting with `#` are comments and skipped.
pub struct LinesIter<'text> {
    iter: IntoIter<&'text str>
}

impl<'text> LinesIter<'text> {
    pub fn new(text: &'text str) -> Self {
        let lines: Vec<&str> = text.lines()
            .map(|w| w.trim())
            .filter(|w| !w.is_empty() && !w.starts_with('#'))
            .collect();
        LinesIter { iter: lines.into_iter() }
    }

    pub fn next_or_empty(&mut self) -> &'text str {
        self.iter.next().unwrap_or("")
    }

    pub fn len(&self) -> usize { self.iter.len() }
}

impl<'text> Iterator for LinesIter<'text> {
    type Item = &'text str;

    fn next(&mut self) -> Option<Self::Item> { self.iter.next() }
}


pub struct WordsIter<'text> {
    iter: IntoIter<&'text str>
}

impl<'text> WordsIter<'text> {
    /// An empty `divider` splits on any whitespace.
    pub fn new(text: &'text str, divider: &str) -> Self {
        let words: Vec<&str> = if divider.is_empty() {
            text.split_whitespace().collect()
        } else {
            text.split(divider)
                .map(|w| w.trim())
                .filter(|w| !w.is_empty())
                .collect()
        };
        WordsIter { iter: words.into_iter() }
    }

    pub fn next_or_empty(&mut self) -> &'text str {
        self.iter.next().unwrap_or("")
    }

    pub fn len(&self) -> usize { self.iter.len() }
}

impl<'text> Iterator for WordsIter<'text> {
    type Item = &'text str;

    fn next(&mut self) -> Option<Self::Item> { self.iter.next() }
}


/// Splits `key: value` at the first colon.
pub fn split_key_value(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let key = line[..colon].trim();
    let value = line[colon + 1..].trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_skip_empty_parts() {
        let blocks: Vec<&str> = TextBlocksIter::new("a\n||\n\n||\nb", "||").collect();
        assert_eq!(blocks, vec!["a", "b"]);
    }

    #[test]
    fn lines_skip_comments() {
        let mut lines = LinesIter::new("# header\n first \n\nsecond");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.next_or_empty(), "first");
        assert_eq!(lines.next_or_empty(), "second");
        assert_eq!(lines.next_or_empty(), "");
    }

    #[test]
    fn words_split_on_whitespace() {
        let words: Vec<&str> = WordsIter::new("1.0\t 2  3", "").collect();
        assert_eq!(words, vec!["1.0", "2", "3"]);
    }

    #[test]
    fn key_value_split() {
        assert_eq!(split_key_value("window: hanning"), Some(("window", "hanning")));
        assert_eq!(split_key_value("offset:-1"), Some(("offset", "-1")));
        assert_eq!(split_key_value(": x"), None);
        assert_eq!(split_key_value("no colon"), None);
    }
}
