mod format_gate;
mod link_list;
