use handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
};

use crate::modules::helpers::handelbars::format_pace::check_param_count;

/// # json helper
/// a formatter to convert chart data to json for use in javascript
///
/// ### usage
/// ```handlebars
/// {{toJson chart_data}}
/// ```
#[derive(Clone, Copy)]
pub struct ToJson;

impl HelperDef for ToJson {
    fn call<'reg: 'rc, 'rc>(
        &self,
        helper: &Helper<'reg, 'rc>,
        _: &'reg Handlebars<'reg>,
        _: &'rc Context,
        _: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        check_param_count(helper, 1)?;

        let value = match helper.param(0) {
            Some(param) => param.value(),
            None => return Ok(()),
        };

        let json = serde_json::to_string(value)
            .map_err(|error| RenderError::new(format!("could not serialize to json: {}", error)))?;
        // keep driver names from closing the surrounding script tag
        out.write(&json.replace("</", "<\\/"))?;
        Ok(())
    }
}
