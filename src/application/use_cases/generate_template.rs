//! # Template Generation
//!
//! 種別ごとのCSVテンプレート（ヘッダーと例の行）

use crate::domain::entities::import_kind::ImportKind;

const ACCESSIBILITY_TEMPLATE: &str = "\
idTvCultura,linkLibras,linkAudiodescricao,ccLegenda
VA001,https://exemplo.com/libras1.mp4,https://exemplo.com/audio1.mp4,true
VA002,https://exemplo.com/libras2.mp4,https://exemplo.com/audio2.mp4,false
";

const DISCIPLINES_TEMPLATE: &str = "\
codigo,nome,cargaHoraria,cursos
MAT001,Matemática Básica,80,1
MAT002,Álgebra Linear,60,1;2
";

const LECTURES_TEMPLATE: &str = "\
idTvCultura,titulo,codigoDisciplina,ano,bimestreOperacional,semana,numeroAula,sinopse,linkYoutubeOriginal,duracaoMinutos
VA001,Introdução à Matemática,MAT001,2025,1,1,1,Conceitos básicos de matemática,https://youtube.com/watch?v=example,45
VA002,Álgebra Linear,MAT002,2025,1,1,2,Vetores e matrizes,https://youtube.com/watch?v=example2,50
VA003,Cálculo I,MAT003,2025,2,2,1,Limites e derivadas,https://youtube.com/watch?v=example3,60
";

/// テンプレート生成
pub struct TemplateGenerator;

impl TemplateGenerator {
    /// テンプレートの内容
    pub fn content(kind: ImportKind) -> &'static str {
        match kind {
            ImportKind::Accessibility => ACCESSIBILITY_TEMPLATE,
            ImportKind::Disciplines => DISCIPLINES_TEMPLATE,
            ImportKind::Lectures => LECTURES_TEMPLATE,
        }
    }

    /// ダウンロード時のファイル名
    pub fn file_name(kind: ImportKind) -> String {
        format!("template_{}.csv", kind.as_str())
    }
}
