use crate::{
    builder::Select,
    error::Result,
    writer::{FormatContext, FormatWriter},
};

/// `(` + the nested select on its own indented lines + `)`.
pub(crate) fn write_subquery(context: &mut FormatContext<'_>, select: &Select) -> Result<()> {
    context.write_block(|context| select.format_writer(context))
}
