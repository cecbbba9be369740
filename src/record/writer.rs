//! record/writer - сериализация MetricsRecord в компактный теговый текст.

use log::debug;
use std::path::Path;

use crate::consts::*;
use crate::fs_utils;
use crate::xml::XmlWriter;

use super::{MetricsRecord, RecordError, SubprocessResult};

/// Примерный размер канонического документа (~1.2 KiB), чтобы не переаллоцировать.
const XML_CAPACITY_HINT: usize = 1536;

impl MetricsRecord {
    /// Канонический документ: без пробелов между элементами и без перевода строки в конце.
    pub fn to_xml_string(&self) -> String {
        let mut w = XmlWriter::with_capacity(XML_CAPACITY_HINT);
        w.open(TAG_CONTAINER);

        // Порядок ниже совпадает с порядком полей MetricsRecord.
        w.text_element(TAG_VERSION, self.schema_version)
            .text_element(TAG_APEX_BUILD_VERSION, self.apex_build_version)
            .text_element(TAG_TRIGGER, self.trigger)
            .text_element(TAG_STAGE_REACHED, self.stage_reached)
            .text_element(TAG_STATUS, self.status)
            .text_element(TAG_CACHE_FREE_START_MIB, self.cache_free_start_mib)
            .text_element(TAG_CACHE_FREE_END_MIB, self.cache_free_end_mib)
            .text_element(TAG_PRIMARY_COMPILE_MILLIS, self.primary_compile_millis)
            .text_element(TAG_SECONDARY_COMPILE_MILLIS, self.secondary_compile_millis)
            .text_element(TAG_SYSTEM_SERVER_COMPILE_MILLIS, self.system_server_compile_millis);

        for (name, result) in self.subprocess_results() {
            write_exec_result(&mut w, name, result);
        }

        w.text_element(TAG_PRIMARY_COMPILE_TYPE, self.primary_compile_type)
            .text_element(TAG_SECONDARY_COMPILE_TYPE, self.secondary_compile_type);

        w.close(TAG_CONTAINER);
        w.finish()
    }

    /// Записать запись в файл (create/truncate). Значения не валидируются.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let path = path.as_ref();
        let xml = self.to_xml_string();
        fs_utils::write_truncate(path, xml.as_bytes()).map_err(|e| RecordError::io(path, e))?;
        debug!("metrics: wrote {} bytes to {}", xml.len(), path.display());
        Ok(())
    }

    /// Как write_to_file, но через tmp+rename: читатель никогда не увидит половину файла.
    pub fn write_to_file_atomic(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        let path = path.as_ref();
        let xml = self.to_xml_string();
        fs_utils::write_atomic(path, xml.as_bytes()).map_err(|e| RecordError::io(path, e))?;
        debug!("metrics: atomically wrote {} bytes to {}", xml.len(), path.display());
        Ok(())
    }
}

fn write_exec_result(w: &mut XmlWriter, name: &str, r: &SubprocessResult) {
    w.empty_element(
        name,
        &[
            (ATTR_STATUS, r.status),
            (ATTR_EXIT_CODE, r.exit_code),
            (ATTR_SIGNAL, r.signal),
        ],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_bytes() {
        let mut r = MetricsRecord::new(81966764218039518);
        r.trigger = 1;
        r.stage_reached = 30;
        r.status = -4;
        r.cache_free_start_mib = 1000;
        r.cache_free_end_mib = 900;
        r.primary_compile_millis = 1234;
        r.primary_subprocess_result = SubprocessResult::new(2, -1, 9);
        r.secondary_compile_type = 4294967295;

        let expected = concat!(
            "<odrefresh_metrics>",
            "<odrefresh_metrics_version>4</odrefresh_metrics_version>",
            "<apex_build_version>81966764218039518</apex_build_version>",
            "<trigger>1</trigger>",
            "<stage_reached>30</stage_reached>",
            "<status>-4</status>",
            "<cache_space_free_start_mib>1000</cache_space_free_start_mib>",
            "<cache_space_free_end_mib>900</cache_space_free_end_mib>",
            "<primary_bcp_compilation_millis>1234</primary_bcp_compilation_millis>",
            "<secondary_bcp_compilation_millis>0</secondary_bcp_compilation_millis>",
            "<system_server_compilation_millis>0</system_server_compilation_millis>",
            r#"<primary_bcp_dex2oat_result status="2" exit-code="-1" signal="9" />"#,
            r#"<secondary_bcp_dex2oat_result status="5" exit-code="-1" signal="0" />"#,
            r#"<system_server_dex2oat_result status="5" exit-code="-1" signal="0" />"#,
            "<primary_bcp_compilation_type>0</primary_bcp_compilation_type>",
            "<secondary_bcp_compilation_type>4294967295</secondary_bcp_compilation_type>",
            "</odrefresh_metrics>",
        );
        assert_eq!(r.to_xml_string(), expected);
    }

    #[test]
    fn unwritable_path_is_io_error() {
        let r = MetricsRecord::new(1);
        let dir = std::env::temp_dir().join(format!("odrm-nodir-{}", std::process::id()));
        let e = r.write_to_file(dir.join("no").join("such").join("m.xml")).unwrap_err();
        assert_eq!(e.kind(), crate::record::RecordErrorKind::Io);
    }
}
