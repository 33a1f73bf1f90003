use crate::{
    error::Result,
    writer::{FormatContext, FormatWriter},
};

/// LIMIT / OFFSET of a select, set directly or from a page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    current_page: usize,
    per_page: usize,
    pub maybe_limit: Option<usize>,
    pub maybe_offset: Option<usize>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self {
            per_page: 15,
            current_page: 1,
            maybe_limit: None,
            maybe_offset: None,
        }
    }
}

impl Paginator {
    fn inner_paginate(&mut self) {
        let per_page = self.per_page;
        let offset = (self.current_page - 1).saturating_mul(per_page);
        self.maybe_offset = (offset > 0).then_some(offset);
        self.maybe_limit = Some(per_page);
    }

    pub fn limit(&mut self, limit: usize) {
        self.maybe_limit = Some(limit);
    }

    pub fn offset(&mut self, offset: usize) {
        self.maybe_offset = Some(offset);
    }

    /// Pages are 1-based; page 0 is read as the first page.
    pub fn paginate(&mut self, page: usize, per_page: usize) {
        self.current_page = page.max(1);
        self.per_page = per_page;
        self.inner_paginate();
    }

    pub fn is_empty(&self) -> bool {
        self.maybe_limit.is_none() && self.maybe_offset.is_none()
    }
}

impl FormatWriter for Paginator {
    fn format_writer(&self, context: &mut FormatContext<'_>) -> Result<()> {
        if let Some(limit) = self.maybe_limit {
            context.write_clause("LIMIT", |context| {
                context.write_display(limit);
                Ok(())
            })?;
        }
        if let Some(offset) = self.maybe_offset {
            context.write_clause("OFFSET", |context| {
                context.write_display(offset);
                Ok(())
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{dialect::Dialect, tests::format_writer};

    use super::*;

    #[test]
    fn test_paginate() {
        let mut paginator = Paginator::default();
        assert!(paginator.is_empty());
        paginator.paginate(3, 20);
        assert_eq!(Some(20), paginator.maybe_limit);
        assert_eq!(Some(40), paginator.maybe_offset);
        paginator.paginate(0, 10);
        assert_eq!(None, paginator.maybe_offset);
    }

    #[test]
    fn test_render() {
        let mut paginator = Paginator::default();
        paginator.limit(5);
        paginator.offset(10);
        assert_eq!(
            "LIMIT\n    5\nOFFSET\n    10",
            format_writer(&paginator, Dialect::STANDARD).unwrap()
        );
    }
}
