mod config_loading;
mod merge_presets;
