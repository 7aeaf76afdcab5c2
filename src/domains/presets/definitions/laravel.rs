//! Laravel directory layout.

use super::PresetDefinition;

pub struct LaravelPreset;

impl PresetDefinition for LaravelPreset {
    const KEY: &'static str = "laravel";
    const NAME: &'static str = "Laravel";
    const DESCRIPTION: &'static str =
        "Laravel Framework directory structure with app, resources, storage, and database directories";

    const PATHS: &'static [(&'static str, &'static str)] = &[
        ("app", "app"),
        ("bootstrap", "bootstrap"),
        ("config", "config"),
        ("database", "database"),
        ("resources", "resources"),
        ("routes", "routes"),
        ("storage", "storage"),
        ("controllers", "app/Http/Controllers"),
        ("middleware", "app/Http/Middleware"),
        ("models", "app/Models"),
        ("providers", "app/Providers"),
        ("console", "app/Console"),
        ("exceptions", "app/Exceptions"),
        ("jobs", "app/Jobs"),
        ("listeners", "app/Listeners"),
        ("mail", "app/Mail"),
        ("notifications", "app/Notifications"),
        ("policies", "app/Policies"),
        ("rules", "app/Rules"),
        ("views", "resources/views"),
        ("lang", "resources/lang"),
        ("css", "resources/css"),
        ("js", "resources/js"),
        ("sass", "resources/sass"),
        ("logs", "storage/logs"),
        ("cache", "storage/framework/cache"),
        ("sessions", "storage/framework/sessions"),
        ("uploads", "storage/app/public"),
        ("private_storage", "storage/app"),
        ("migrations", "database/migrations"),
        ("seeders", "database/seeders"),
        ("factories", "database/factories"),
        ("assets", "public/assets"),
        ("images", "public/images"),
        ("build", "public/build"),
        ("bootstrap_cache", "bootstrap/cache"),
    ];
}
