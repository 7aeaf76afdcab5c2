//! Slim 4 directory layout.

use super::PresetDefinition;

pub struct Slim4Preset;

impl PresetDefinition for Slim4Preset {
    const KEY: &'static str = "slim4";
    const NAME: &'static str = "Slim 4";
    const DESCRIPTION: &'static str =
        "Slim 4 Framework directory structure with src, templates, and var directories";

    const PATHS: &'static [(&'static str, &'static str)] = &[
        ("src", "src"),
        ("config", "config"),
        ("templates", "templates"),
        ("var", "var"),
        ("bin", "bin"),
        ("actions", "src/Action"),
        ("handlers", "src/Handler"),
        ("middleware", "src/Middleware"),
        ("services", "src/Service"),
        ("repositories", "src/Repository"),
        ("entities", "src/Entity"),
        ("factories", "src/Factory"),
        ("exceptions", "src/Exception"),
        ("views", "templates"),
        ("layouts", "templates/layout"),
        ("partials", "templates/partial"),
        ("cache", "var/cache"),
        ("logs", "var/log"),
        ("storage", "var/storage"),
        ("uploads", "var/uploads"),
        ("tmp", "var/tmp"),
        ("assets", "public/assets"),
        ("css", "public/assets/css"),
        ("js", "public/assets/js"),
        ("images", "public/assets/images"),
        ("fonts", "public/assets/fonts"),
        ("routes", "config/routes"),
        ("settings", "config/settings"),
        ("dependencies", "config/dependencies"),
    ];
}
