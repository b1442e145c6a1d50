//! Console output, prompts and progress reporting.

pub mod console;
pub mod progress;

pub use console::{
    print_banner, print_course_stats, print_error, print_info, print_run_stats, print_success,
    print_warning, prompt_choice, prompt_line, prompt_password,
};
pub use progress::{create_download_bar, create_segment_bar, create_spinner};
