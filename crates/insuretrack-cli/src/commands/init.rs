//! `insuretrack init`

use insuretrack_engine::commands::accounts::{
    ensure_default_admin, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME,
};

use super::{CliResult, Context};

pub fn execute(ctx: &mut Context) -> CliResult {
    // Opening the context already applied migrations.
    match ensure_default_admin(&mut ctx.conn)? {
        Some(admin) => println!(
            "Created default admin '{}' (id {}) with password '{}'",
            DEFAULT_ADMIN_USERNAME, admin.id, DEFAULT_ADMIN_PASSWORD
        ),
        None => println!("Admin account already present"),
    }
    println!(
        "Database ready: {}",
        ctx.services.config.database_path.display()
    );
    Ok(())
}
