//! Texts shown to the user under the command line of the interface.

pub const BROKEN_BANNER: &str = "\n\n                    INTERFACE IS BROKEN !\nPLEASE, FIX IT MANUALLY OR IT WILL BE RESTORED WITH POSSIBLE DATA LOOSING";

pub const EMPTY_TEXT: &str = "THE TEXT FIELD IS EMPTY.\nIT WILL NOT BE ADDED TO BASE";
pub const NEW_UNNAMED: &str = "NEW UNNAMED RECORD WAS PUSHED TO BASE";
pub const ADD_NEW: &str = "ADD A NEW RECORD TO THE BASE?";
pub const NO_ROOT: &str = "NO ROOT RECORDS WERE FOUND.\nEVERY RECORD HAS A PARENT";
pub const EMPTY_TREE: &str = "THERE IS NOTHING TO SHOW";
pub const PRIMARY_LOADED: &str = "THE PRIMARY BASE IS LOADED";

pub fn new_named(name: &str) -> String {
    format!("NEW RECORD NAMED \"{name}\"\nWAS PUSHED TO BASE")
}

pub fn exists_mix(name: &str) -> String {
    format!("A RECORD NAMED \"{name}\"\nALREADY EXISTS.\nMIX WITH IT?")
}

pub fn mixed(name: &str) -> String {
    format!("RECORDS NAMED \"{name}\"\nWERE MIXED.")
}

pub fn edited(name: &str) -> String {
    format!("A RECORD NAMED \"{name}\"\nWAS SUCCESSFULLY EDITED")
}

pub fn ready_for_editing(name: &str) -> String {
    format!("A RECORD NAMED \"{name}\"\nIS READY FOR EDITING")
}

pub fn deleted(name: &str) -> String {
    format!("A RECORD NAMED \"{name}\"\nWAS DELETED")
}

pub fn wrong_command(token: &str) -> String {
    format!("A COMMAND \"{token}\" DOES NOT EXIST")
}

pub fn circular(victim: &str, parent: &str) -> String {
    format!(
        "CIRCULAR REFERENCE: A RECORD NAMED \"{victim}\"\nIS AN ANCESTOR OF ITS PARENT \"{parent}\".\nFIX ITS TAGS AND RUN \"edit\""
    )
}

pub fn unknown_root(name: &str) -> String {
    format!("A RECORD NAMED \"{name}\"\nIS NOT IN THE TREE")
}

pub fn tree_shown(rows: usize) -> String {
    format!("TREE OF {rows} RECORDS")
}

pub fn base_loaded(alias: &str) -> String {
    format!("THE BASE \"{alias}\" IS LOADED")
}

pub fn unknown_base(alias: &str, known: &[&str]) -> String {
    if known.is_empty() {
        return format!("A BASE \"{alias}\" DOES NOT EXIST.\nNO ALTERNATE BASES ARE CONFIGURED");
    }
    format!(
        "A BASE \"{alias}\" DOES NOT EXIST.\nKNOWN BASES: {}",
        known.join(", ")
    )
}
