//! Command line sprite geometry editor.

use sprite_editor::core;

fn main() {
    core::platform::init_panic_handling();
    let result = core::platform::get_cli_args().and_then(core::run_app);
    match result {
        Ok(()) => {}
        Err(error) => core::platform::handle_error(error),
    }
}
