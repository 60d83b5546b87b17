//! Prompt builders for the three passes.
//!
//! Every function here is pure: languages, texts and chunk position in,
//! a system message and a user prompt out. Nothing in this module talks to
//! a completion endpoint.

use crate::types::TranslationRequest;

pub const TRANSLATE_OPEN: &str = "<TRANSLATE_THIS>";
pub const TRANSLATE_CLOSE: &str = "</TRANSLATE_THIS>";

/// A system message and user prompt pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// The language pair and locale hint every prompt is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptContext<'a> {
    pub source_lang: &'a str,
    pub target_lang: &'a str,
    /// Empty when no regional variety was requested
    pub country: &'a str,
}

impl<'a> PromptContext<'a> {
    pub fn new(source_lang: &'a str, target_lang: &'a str, country: &'a str) -> Self {
        Self {
            source_lang,
            target_lang,
            country,
        }
    }

    pub fn from_request(request: &'a TranslationRequest) -> Self {
        Self::new(
            request.source_lang.trim(),
            request.target_lang.trim(),
            request.country.trim(),
        )
    }

    /// Style line steering the critique toward a regional variety, if any.
    fn country_line(&self) -> String {
        if self.country.is_empty() {
            String::new()
        } else {
            format!(
                "The final style and tone of the translation should match the style of {} colloquially spoken in {}.\n",
                self.target_lang, self.country
            )
        }
    }

    fn review_criteria(&self) -> String {
        format!(
            "When writing suggestions, pay attention to whether there are ways to improve the translation's \n\
             (i) accuracy (by correcting errors of addition, mistranslation, omission, or untranslated text),\n\
             (ii) fluency (by applying {target} grammar, spelling and punctuation rules, and ensuring there are no unnecessary repetitions),\n\
             (iii) style (by ensuring the translations reflect the style of the source text and take into account any cultural context),\n\
             (iv) terminology (by ensuring terminology use is consistent and reflects the source text domain; and by only ensuring you use equivalent idioms {target}).\n",
            target = self.target_lang
        )
    }

    fn edit_criteria(&self) -> String {
        format!(
            "(i) accuracy (by correcting errors of addition, mistranslation, omission, or untranslated text),\n\
             (ii) fluency (by applying {} grammar, spelling and punctuation rules and ensuring there are no unnecessary repetitions),\n\
             (iii) style (by ensuring the translations reflect the style of the source text),\n\
             (iv) terminology (inappropriate for context, inconsistent use), or\n\
             (v) other errors.\n",
            self.target_lang
        )
    }
}

/// The full chunk sequence with chunk `index` wrapped in translation markers.
///
/// Every other chunk appears unmarked, as read-only context.
pub fn tag_chunk(chunks: &[String], index: usize) -> String {
    let capacity = chunks.iter().map(String::len).sum::<usize>()
        + TRANSLATE_OPEN.len()
        + TRANSLATE_CLOSE.len();
    let mut tagged = String::with_capacity(capacity);
    for (i, chunk) in chunks.iter().enumerate() {
        if i == index {
            tagged.push_str(TRANSLATE_OPEN);
            tagged.push_str(chunk);
            tagged.push_str(TRANSLATE_CLOSE);
        } else {
            tagged.push_str(chunk);
        }
    }
    tagged
}

// Whole-text prompts

pub fn initial_translation(ctx: &PromptContext<'_>, source_text: &str) -> Prompt {
    let system = format!(
        "You are an expert linguist, specializing in translation from {} to {}.",
        ctx.source_lang, ctx.target_lang
    );
    let user = format!(
        "This is an {src} to {tgt} translation, please provide the {tgt} translation for this text. \
         Do not provide any explanations or text apart from the translation.\n\
         {src}: {text}\n\n\
         {tgt}:",
        src = ctx.source_lang,
        tgt = ctx.target_lang,
        text = source_text
    );
    Prompt::new(system, user)
}

pub fn reflection(ctx: &PromptContext<'_>, source_text: &str, translation: &str) -> Prompt {
    let system = format!(
        "You are an expert linguist specializing in translation from {} to {}. \
         You will be provided with a source text and its translation and your goal is to improve the translation.",
        ctx.source_lang, ctx.target_lang
    );
    let user = format!(
        "Your task is to carefully read a source text and a translation from {src} to {tgt}, and then give constructive criticism and helpful suggestions to improve the translation.\n\
         {country}\n\
         The source text and initial translation, delimited by XML tags <SOURCE_TEXT></SOURCE_TEXT> and <TRANSLATION></TRANSLATION>, are as follows:\n\n\
         <SOURCE_TEXT>\n{text}\n</SOURCE_TEXT>\n\n\
         <TRANSLATION>\n{translation}\n</TRANSLATION>\n\n\
         {criteria}\n\
         Write a list of specific, helpful and constructive suggestions for improving the translation.\n\
         Each suggestion should address one specific part of the translation.\n\
         Output only the suggestions and nothing else.",
        src = ctx.source_lang,
        tgt = ctx.target_lang,
        country = ctx.country_line(),
        text = source_text,
        translation = translation,
        criteria = ctx.review_criteria()
    );
    Prompt::new(system, user)
}

pub fn improvement(
    ctx: &PromptContext<'_>,
    source_text: &str,
    translation: &str,
    reflection: &str,
) -> Prompt {
    let system = format!(
        "You are an expert linguist, specializing in translation editing from {} to {}.",
        ctx.source_lang, ctx.target_lang
    );
    let user = format!(
        "Your task is to carefully read, then edit, a translation from {src} to {tgt}, taking into account a list of expert suggestions and constructive criticisms.\n\n\
         The source text, the initial translation, and the expert linguist suggestions are delimited by XML tags <SOURCE_TEXT></SOURCE_TEXT>, <TRANSLATION></TRANSLATION> and <EXPERT_SUGGESTIONS></EXPERT_SUGGESTIONS> as follows:\n\n\
         <SOURCE_TEXT>\n{text}\n</SOURCE_TEXT>\n\n\
         <TRANSLATION>\n{translation}\n</TRANSLATION>\n\n\
         <EXPERT_SUGGESTIONS>\n{reflection}\n</EXPERT_SUGGESTIONS>\n\n\
         Please take into account the expert suggestions when editing the translation. Edit the translation by ensuring:\n\n\
         {criteria}\n\
         Output only the new translation and nothing else.",
        src = ctx.source_lang,
        tgt = ctx.target_lang,
        text = source_text,
        translation = translation,
        reflection = reflection,
        criteria = ctx.edit_criteria()
    );
    Prompt::new(system, user)
}

// Per-chunk prompts

pub fn chunk_initial_translation(ctx: &PromptContext<'_>, chunks: &[String], index: usize) -> Prompt {
    let system = format!(
        "You are an expert linguist, specializing in translation from {} to {}.",
        ctx.source_lang, ctx.target_lang
    );
    let user = format!(
        "Your task is to provide a professional translation from {src} to {tgt} of PART of a text.\n\n\
         The source text is below, delimited by XML tags <SOURCE_TEXT> and </SOURCE_TEXT>. \
         Translate only the part within the source text delimited by {open} and {close}. \
         You can use the rest of the source text as context, but do not translate any of the other text. \
         Do not output anything other than the translation of the indicated part of the text.\n\n\
         <SOURCE_TEXT>\n{tagged}\n</SOURCE_TEXT>\n\n\
         To reiterate, you should translate only this part of the text, shown here again between {open} and {close}:\n\
         {open}\n{chunk}\n{close}\n\n\
         Output only the translation of the portion you are asked to translate, and nothing else.",
        src = ctx.source_lang,
        tgt = ctx.target_lang,
        open = TRANSLATE_OPEN,
        close = TRANSLATE_CLOSE,
        tagged = tag_chunk(chunks, index),
        chunk = chunks[index]
    );
    Prompt::new(system, user)
}

pub fn chunk_reflection(
    ctx: &PromptContext<'_>,
    chunks: &[String],
    index: usize,
    translation: &str,
) -> Prompt {
    let system = format!(
        "You are an expert linguist specializing in translation from {} to {}. \
         You will be provided with a source text and its translation and your goal is to improve the translation.",
        ctx.source_lang, ctx.target_lang
    );
    let user = format!(
        "Your task is to carefully read a source text and part of a translation of that text from {src} to {tgt}, and then give constructive criticism and helpful suggestions for improving the translation.\n\
         {country}\n\
         The source text is below, delimited by XML tags <SOURCE_TEXT> and </SOURCE_TEXT>, and the part that has been translated is delimited by {open} and {close} within the source text. \
         You can use the rest of the source text as context for critiquing the translated part.\n\n\
         <SOURCE_TEXT>\n{tagged}\n</SOURCE_TEXT>\n\n\
         To reiterate, only part of the text is being translated, shown here again between {open} and {close}:\n\
         {open}\n{chunk}\n{close}\n\n\
         The translation of the indicated part, delimited below by <TRANSLATION> and </TRANSLATION>, is as follows:\n\
         <TRANSLATION>\n{translation}\n</TRANSLATION>\n\n\
         {criteria}\n\
         Write a list of specific, helpful and constructive suggestions for improving the translation.\n\
         Each suggestion should address one specific part of the translation.\n\
         Output only the suggestions and nothing else.",
        src = ctx.source_lang,
        tgt = ctx.target_lang,
        country = ctx.country_line(),
        open = TRANSLATE_OPEN,
        close = TRANSLATE_CLOSE,
        tagged = tag_chunk(chunks, index),
        chunk = chunks[index],
        translation = translation,
        criteria = ctx.review_criteria()
    );
    Prompt::new(system, user)
}

pub fn chunk_improvement(
    ctx: &PromptContext<'_>,
    chunks: &[String],
    index: usize,
    translation: &str,
    reflection: &str,
) -> Prompt {
    let system = format!(
        "You are an expert linguist, specializing in translation editing from {} to {}.",
        ctx.source_lang, ctx.target_lang
    );
    let user = format!(
        "Your task is to carefully read, then improve, a translation from {src} to {tgt}, taking into account a set of expert suggestions and constructive criticisms. \
         Below, the source text, initial translation, and expert suggestions are provided.\n\n\
         The source text is below, delimited by XML tags <SOURCE_TEXT> and </SOURCE_TEXT>, and the part that has been translated is delimited by {open} and {close} within the source text. \
         You can use the rest of the source text as context, but need to provide a translation only of the part indicated by {open} and {close}.\n\n\
         <SOURCE_TEXT>\n{tagged}\n</SOURCE_TEXT>\n\n\
         To reiterate, only part of the text is being translated, shown here again between {open} and {close}:\n\
         {open}\n{chunk}\n{close}\n\n\
         The translation of the indicated part, delimited below by <TRANSLATION> and </TRANSLATION>, is as follows:\n\
         <TRANSLATION>\n{translation}\n</TRANSLATION>\n\n\
         The expert translation suggestions of the indicated part, delimited below by <EXPERT_SUGGESTIONS> and </EXPERT_SUGGESTIONS>, are as follows:\n\
         <EXPERT_SUGGESTIONS>\n{reflection}\n</EXPERT_SUGGESTIONS>\n\n\
         Taking into account the expert suggestions rewrite the translation to improve it, paying attention to whether there are ways to improve the translation's\n\n\
         {criteria}\n\
         Output only the new translation of the indicated part and nothing else.",
        src = ctx.source_lang,
        tgt = ctx.target_lang,
        open = TRANSLATE_OPEN,
        close = TRANSLATE_CLOSE,
        tagged = tag_chunk(chunks, index),
        chunk = chunks[index],
        translation = translation,
        reflection = reflection,
        criteria = ctx.edit_criteria()
    );
    Prompt::new(system, user)
}
