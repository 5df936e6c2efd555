mod entry;
mod helpers;
mod settings;
mod summary;
mod transfer;

use deficit_core::EntryStore;
use deficit_core::db::Database;

pub(crate) use entry::{cmd_add, cmd_clear_day, cmd_delete, cmd_quick, cmd_reset};
pub(crate) use settings::{
    cmd_bmr_calc, cmd_bmr_clear, cmd_bmr_show, cmd_goal_set, cmd_goal_show, cmd_theme_set,
    cmd_theme_show, cmd_theme_toggle,
};
pub(crate) use summary::{cmd_history, cmd_streak, cmd_summary, cmd_today};
pub(crate) use transfer::{cmd_export, cmd_import};

/// The entry store as the CLI opens it.
pub(crate) type Tracker = EntryStore<Database>;
