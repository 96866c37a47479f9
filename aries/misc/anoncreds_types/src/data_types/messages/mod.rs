pub mod cred_selection;
