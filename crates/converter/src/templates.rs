//! Template loading and management

use crate::Result;
use tera::Tera;

/// Load the repro script template
pub fn load_templates() -> Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_template("repro.sh", include_str!("../templates/repro.sh.tera"))?;
    Ok(tera)
}

/// Render a script that reruns `pulumi` with `args`
pub fn render_repro_script(args: &[String]) -> Result<String> {
    let tera = load_templates()?;
    let mut context = tera::Context::new();
    context.insert("args", args);
    Ok(tera.render("repro.sh", &context)?)
}
