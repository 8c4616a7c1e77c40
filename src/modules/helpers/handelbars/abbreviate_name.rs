use handlebars::{
    html_escape, Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext,
};

use crate::modules::helpers::general::Helpers;
use crate::modules::helpers::handelbars::format_pace::check_param_count;

/// # driver name helper
/// shortens a driver name to fit the pace table
///
/// ### usage
/// ```handlebars
/// {{abbreviateName "Greg Kachadurian"}}
/// ```
///
/// ### output
/// ```text
/// G. Kachadurian
/// ```
#[derive(Clone, Copy)]
pub struct AbbreviateName;

impl HelperDef for AbbreviateName {
    fn call<'reg: 'rc, 'rc>(
        &self,
        helper: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        check_param_count(helper, 1)?;

        let name = match helper.param(0).and_then(|param| param.value().as_str()) {
            Some(name) => name,
            None => return Ok(()),
        };

        out.write(&html_escape(&Helpers::abbreviate_name(name)))?;
        Ok(())
    }
}
