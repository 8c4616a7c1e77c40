use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
};

/// # pace formatting helper
/// a formatter to display a pace percentage with two decimals. Missing values
/// render as an empty cell.
///
/// ### usage
/// ```handlebars
/// {{formatPace 104.5}}
/// {{formatPace null}}
/// ```
///
/// ### output
/// ```text
/// 104.50
///
/// ```
#[derive(Clone, Copy)]
pub struct FormatPace;

impl HelperDef for FormatPace {
    fn call<'reg: 'rc, 'rc>(
        &self,
        helper: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        check_param_count(helper, 1)?;

        let pace = match helper.param(0).and_then(|param| param.value().as_f64()) {
            Some(pace) => pace,
            None => return Ok(()),
        };

        out.write(&format!("{:.2}", pace))?;
        Ok(())
    }
}

pub fn check_param_count(h: &Helper, n: u64) -> Result<(), RenderError> {
    if h.params().len() != n as usize {
        return Err(RenderError::new(format!(
            "Wrong number of arguments for helper \"{}\", {n} was expected but {} were given",
            h.name(),
            h.params().len()
        )));
    }

    Ok(())
}
