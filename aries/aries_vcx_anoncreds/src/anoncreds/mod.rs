pub mod base_anoncreds;
