//! System instructions, prompts and response schemas sent to the model.

use serde_json::{json, Value};

pub const TRANSLATION_INSTRUCTION: &str = "Anda adalah penerjemah ahli Bahasa Indonesia ke Bahasa Arab. Tugas Anda adalah menerjemahkan kalimat dan memberikan penjelasan per kata. Anda HARUS mengembalikan respons dalam format JSON yang terstruktur. Jangan sertakan analisis kata kunci yang mendalam, fokus hanya pada terjemahan dan penjelasan langsung.";

pub const KEYWORD_INSTRUCTION: &str = "Anda adalah ahli tata bahasa Arab (Nahwu & Sharaf). Dari kalimat Bahasa Indonesia yang diberikan, ekstrak kata-kata kunci yang penting. Anda HARUS memberikan analisis mendalam untuk setiap kata.
   - Tentukan `indonesian`, `translation` (objek `{arabic, translit}`), dan `type` ('fi'il', 'isim', atau 'lainnya').
   - **WAJIB:** Jika `type` adalah 'fi'il', Anda HARUS menyertakan `root` dan `verbForms` (`{madhi, mudhari, amr}`). JANGAN biarkan properti ini kosong.
   - **WAJIB:** Jika `type` adalah 'isim', Anda HARUS menyertakan `nounForms` (`{singular, plural}`). JANGAN biarkan properti ini kosong.
   - Pastikan setiap bentuk kata Arab dalam keyword (translation, root, madhi, dll.) adalah objek yang berisi `arabic` (dengan harakat) dan `translit`.
Anda HARUS mengembalikan respons dalam format JSON yang HANYA berisi objek `keywords`.";

pub const GENERAL_CHAT_INSTRUCTION: &str = "Anda adalah asisten ahli yang berspesialisasi dalam bahasa Arab, Nahwu, dan Sharaf. Jawab pertanyaan pengguna secara informatif dan jelas. Gunakan format Markdown jika diperlukan untuk menyajikan informasi dengan baik (misalnya, daftar, teks tebal). Anda melanjutkan percakapan yang mungkin dimulai dengan terjemahan. Konteks dari pesan sebelumnya sangat penting.";

/// One-shot prompt asking for a very short explanation of a grammatical change.
pub fn grammar_prompt(concept: &str, arabic: &str, translit: &str) -> String {
    format!(
        "Jelaskan secara SANGAT SINGKAT (1-2 kalimat) perubahan tata bahasa pada kata \"{arabic} ({translit})\" dalam konteks \"{concept}\". Contoh: Jika kata adalah 'أَكَلْتُ', jelaskan mengapa diakhiri dengan 'تُ' (artinya 'saya'). Jika kata adalah 'زَوْجَتِي', jelaskan mengapa diakhiri dengan 'ي' (artinya 'milikku'). Langsung ke intinya tanpa pengenalan umum. Gunakan format Markdown."
    )
}

fn arabic_with_translit(description: Option<&str>) -> Value {
    let mut schema = json!({
        "type": "OBJECT",
        "properties": {
            "arabic": {"type": "STRING", "description": "Teks dalam bahasa Arab dengan harakat lengkap."},
            "translit": {"type": "STRING", "description": "Transliterasi fonetik dari teks Arab."}
        },
        "required": ["arabic", "translit"]
    });
    if let Some(description) = description {
        schema["description"] = json!(description);
    }
    schema
}

/// Schema of the translation answer: sentence plus word-by-word explanation.
pub fn translation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "arabic": {"type": "STRING", "description": "Terjemahan lengkap kalimat ke dalam bahasa Arab dengan harakat."},
            "translit": {"type": "STRING", "description": "Transliterasi fonetik dari kalimat Arab lengkap."},
            "explanation": {
                "type": "ARRAY",
                "description": "Penjelasan kata per kata dari kalimat.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "arabic": {"type": "STRING"},
                        "translit": {"type": "STRING"},
                        "indonesian": {"type": "STRING"}
                    },
                    "required": ["arabic", "translit", "indonesian"]
                }
            }
        },
        "required": ["arabic", "translit", "explanation"]
    })
}

/// Schema of the keyword extraction answer: `{keywords: [...]}`.
pub fn keyword_schema() -> Value {
    let form = arabic_with_translit(None);
    json!({
        "type": "OBJECT",
        "properties": {
            "keywords": {
                "type": "ARRAY",
                "description": "Daftar kata kunci penting dari kalimat, termasuk analisis sharafnya.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "indonesian": {"type": "STRING"},
                        "translation": form,
                        "type": {"type": "STRING", "enum": ["fi'il", "isim", "lainnya"]},
                        "root": arabic_with_translit(Some("Akar kata (hanya untuk fi'il).")),
                        "verbForms": {
                            "type": "OBJECT",
                            "description": "Bentuk kata kerja (hanya untuk fi'il).",
                            "properties": {"madhi": form, "mudhari": form, "amr": form}
                        },
                        "nounForms": {
                            "type": "OBJECT",
                            "description": "Bentuk kata benda (hanya untuk isim).",
                            "properties": {"singular": form, "plural": form}
                        }
                    },
                    "required": ["indonesian", "translation", "type"]
                }
            }
        },
        "required": ["keywords"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_schema_required_fields() {
        let schema = translation_schema();
        assert_eq!(schema["required"], json!(["arabic", "translit", "explanation"]));
        assert!(schema["properties"].get("keywords").is_none());
    }

    #[test]
    fn test_keyword_schema_word_types() {
        let schema = keyword_schema();
        let item = &schema["properties"]["keywords"]["items"];
        assert_eq!(item["properties"]["type"]["enum"], json!(["fi'il", "isim", "lainnya"]));
        assert_eq!(item["properties"]["root"]["description"], "Akar kata (hanya untuk fi'il).");
        assert_eq!(
            item["properties"]["verbForms"]["properties"]["amr"]["required"],
            json!(["arabic", "translit"])
        );
    }

    #[test]
    fn test_grammar_prompt_mentions_word_and_concept() {
        let prompt = grammar_prompt("dhamir muttashil", "أَكَلْتُ", "akaltu");
        assert!(prompt.contains("\"أَكَلْتُ (akaltu)\""));
        assert!(prompt.contains("\"dhamir muttashil\""));
    }
}
