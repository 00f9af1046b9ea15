//! Templates written to disk when the user has none yet.

/// One record per block: name line, tags line, free text, separator line.
pub const DEFAULT_BASE_TEMPLATE: &str = "<><name>\n\
<><tags>\n\
<m><text>\n\
==============================================================================\n";

/// The editable note plus the command slot and the read-only tag list.
pub const DEFAULT_INTERFACE_TEMPLATE: &str = "<m><text>\n\
================================== name ======================================\n\
<><name>\n\
================================== tags ======================================\n\
<><tags>\n\
================================ commands ====================================\n\
<m>add<command>\n\
========================== tags used previously ==============================\n\
<>any tag<tags_used>\n";

/// One line per node of the flattened tree view.
pub const DEFAULT_TREE_TEMPLATE: &str = "<><indent>- <><name>\n";
